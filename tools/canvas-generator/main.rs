use clap::Parser;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use simflow::prelude::*;

/// A CLI tool to generate random simulation canvases for load testing the editor
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated canvas JSON file to
    #[arg(short, long, default_value = "generated_canvas.json")]
    output: String,

    /// Number of prompt/response step pairs
    #[arg(long, default_value_t = 25)]
    steps: usize,

    /// Maximum number of branching rules per response step
    #[arg(long, default_value_t = 3)]
    max_rules: usize,

    /// Name stored in the canvas
    #[arg(long, default_value = DEFAULT_SIMULATION_NAME)]
    name: String,
}

const PROMPT_KINDS: [NodeKind; 3] = [NodeKind::EmailPrompt, NodeKind::VoicePrompt, NodeKind::Chat];
const KEYWORDS: [&str; 6] = ["refund", "manager", "cancel", "sorry", "urgent", "thanks"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if cli.steps == 0 {
        eprintln!("Error: --steps must be at least 1");
        std::process::exit(1);
    }

    println!(
        "Generating canvas with {} step pair(s), up to {} rule(s) each...",
        cli.steps, cli.max_rules
    );

    let mut store = GraphStore::new();
    for i in 0..cli.steps {
        let prompt = generate_prompt(&mut rng, i);
        let response = Node::with_defaults(
            format!("response-{}", i),
            NodeKind::Response,
            Position::new(prompt.position.x, prompt.position.y + 150.0),
        );
        let edge = Edge::explicit(format!("edge-{}", i), prompt.id.clone(), response.id.clone());
        store.insert_all(vec![prompt, response], vec![edge])?;
    }
    println!("-> Generated {} nodes.", store.nodes().len());

    let mut rule_count = 0;
    for i in 0..cli.steps {
        let later: Vec<String> = (i + 1..cli.steps).map(|j| format!("prompt-{}", j)).collect();
        if later.is_empty() {
            continue;
        }
        let patch = generate_branching(&mut rng, i, &later, cli.max_rules);
        rule_count += patch.rules.as_ref().map_or(0, Vec::len);
        store.update_node_data(&format!("response-{}", i), patch.into())?;
    }
    println!(
        "-> Generated {} rule(s), {} derived edge(s).",
        rule_count,
        store.derived_edges().len()
    );

    let document = CanvasDocument::capture(&store, cli.name);
    document.save(&cli.output)?;

    println!(
        "Successfully generated and saved canvas to '{}'",
        cli.output
    );

    Ok(())
}

fn generate_prompt(rng: &mut ThreadRng, index: usize) -> Node {
    let kind = PROMPT_KINDS[rng.random_range(0..PROMPT_KINDS.len())];
    let position = Position::new(
        (index % 5) as f64 * 320.0 + rng.random_range(-20.0..20.0),
        (index / 5) as f64 * 400.0,
    );
    let mut node = Node::with_defaults(format!("prompt-{}", index), kind, position);
    match &mut node.data {
        NodeData::EmailPrompt(data) => {
            data.sender_id = "hr".to_string();
            data.subject = format!("Follow-up #{}", index);
            data.body = "Please reply to the customer below.".to_string();
        }
        NodeData::VoicePrompt(data) => {
            data.script = "Hello, I am calling about my order.".to_string();
            data.voice_profile = "neutral".to_string();
            data.call_duration = Some(rng.random_range(30..300));
        }
        _ => {}
    }
    node
}

/// Builds a response patch with random rules and, sometimes, a fallback, all pointing at
/// later prompts so the canvas stays acyclic.
fn generate_branching(
    rng: &mut ThreadRng,
    index: usize,
    later: &[String],
    max_rules: usize,
) -> ResponsePatch {
    let mut rules = Vec::new();
    for r in 0..rng.random_range(0..=max_rules) {
        if let Some(target) = later.choose(rng) {
            let target = target.clone();
            rules.push(generate_rule(rng, format!("rule-{}-{}", index, r), target));
        }
    }

    let fallback = if rng.random_bool(0.3) {
        later.choose(rng).cloned()
    } else {
        None
    };

    ResponsePatch {
        time_limit: Some(rng.random_range(30..=600)),
        has_fallback: Some(fallback.is_some()),
        fallback_node_id: Some(fallback),
        rules: Some(rules),
        ..Default::default()
    }
}

fn generate_rule(rng: &mut ThreadRng, id: String, target: String) -> Rule {
    match rng.random_range(0..3) {
        0 => Rule::new(
            id,
            ConditionType::TextLength,
            Operator::GreaterThan,
            rng.random_range(20..400) as f64,
            target,
        ),
        1 => Rule::new(
            id,
            ConditionType::TimeTaken,
            Operator::LessThan,
            rng.random_range(10..120) as f64,
            target,
        ),
        _ => {
            let words: Vec<String> = KEYWORDS
                .choose_multiple(rng, 2)
                .map(|w| w.to_string())
                .collect();
            Rule::new(id, ConditionType::KeywordMatch, Operator::Contains, words, target)
        }
    }
}
