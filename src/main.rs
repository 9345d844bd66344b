use std::collections::HashMap;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drugpath::shape::{capitalize_first, flat_tree, is_excluded_disease, prune_edge};
use drugpath::state::actions::{select_disease, select_drug};
use drugpath::types::{AttentionMap, AttentionTree};
use drugpath::{ApiClient, Config, Store};

#[derive(Parser, Debug)]
#[command(name = "drugpath")]
#[command(about = "Explore disease-drug predictions and their knowledge-graph explanations")]
struct Args {
    /// Emit JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable diseases
    Diseases,
    /// Rank predicted drugs for a disease
    Predict {
        disease_id: String,

        /// Show at most N predictions
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Show grouped explanation paths for a disease/drug pair
    Paths { disease_id: String, drug_id: String },
    /// Show pruned attention trees for a disease/drug pair
    Tree {
        disease_id: String,
        drug_id: String,

        /// Score threshold below which children are pruned
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum children kept per node
        #[arg(long)]
        max_children: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"))
        .init();

    let args = Args::parse();

    let config = Config::load()?;
    let client = ApiClient::from_config(&config)?;

    match args.command {
        Command::Diseases => run_diseases(&client, args.json).await,
        Command::Predict { disease_id, top } => {
            run_predict(&client, &disease_id, top, args.json).await
        }
        Command::Paths {
            disease_id,
            drug_id,
        } => run_paths(&client, &disease_id, &drug_id, args.json).await,
        Command::Tree {
            disease_id,
            drug_id,
            threshold,
            max_children,
        } => {
            run_tree(
                &client,
                &config,
                &disease_id,
                &drug_id,
                threshold,
                max_children,
                args.json,
            )
            .await
        }
    }
}

async fn run_diseases(client: &ApiClient, json: bool) -> Result<()> {
    let options = client.disease_options().await;
    let names = client.node_name_dict().await;
    let empty = HashMap::new();
    let disease_names = names.get("disease").unwrap_or(&empty);

    let rows: Vec<(String, bool, String)> = options
        .into_iter()
        .filter(|option| !is_excluded_disease(disease_names.get(&option.id).map(String::as_str)))
        .map(|option| {
            let name = disease_names
                .get(&option.id)
                .map(|n| capitalize_first(n))
                .unwrap_or_default();
            (option.id, option.treatable, name)
        })
        .collect();

    if json {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|(id, treatable, name)| {
                serde_json::json!({"id": id, "treatable": treatable, "name": name})
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("\n=== Diseases ({}) ===\n", rows.len());
    if rows.is_empty() {
        println!("No disease options available.");
        return Ok(());
    }
    println!("{:<14} {:<10} NAME", "ID", "TREATABLE");
    println!("{:-<60}", "");
    for (id, treatable, name) in rows {
        println!("{:<14} {:<10} {}", id, treatable, name);
    }
    Ok(())
}

async fn run_predict(client: &ApiClient, disease_id: &str, top: usize, json: bool) -> Result<()> {
    let names = client.node_name_dict().await;

    let mut store = Store::new();
    let generation = store.begin_selection();
    select_disease(client, disease_id, generation, &mut |action| {
        store.dispatch(action)
    })
    .await;

    let state = store.state();
    let shown: Vec<_> = state.drug_predictions.iter().take(top).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("\n=== Drug predictions for {} ===\n", disease_id);
    if shown.is_empty() {
        println!("No predictions available.");
        return Ok(());
    }
    let empty = HashMap::new();
    let drug_names = names.get("drug").unwrap_or(&empty);
    println!("{:<6} {:<10} {:>8}  {:<6} NAME", "RANK", "ID", "SCORE", "KNOWN");
    println!("{:-<64}", "");
    for (i, prediction) in shown.iter().enumerate() {
        let name = drug_names
            .get(&prediction.id)
            .map(|n| capitalize_first(n))
            .unwrap_or_default();
        println!(
            "{:<6} {:<10} {:>8.3}  {:<6} {}",
            i + 1,
            prediction.id,
            prediction.score,
            prediction.known,
            name
        );
    }
    Ok(())
}

async fn run_paths(client: &ApiClient, disease_id: &str, drug_id: &str, json: bool) -> Result<()> {
    let mut store = Store::new();
    let generation = store.begin_selection();
    select_disease(client, disease_id, generation, &mut |action| {
        store.dispatch(action)
    })
    .await;
    select_drug(
        client,
        drug_id,
        Some(disease_id),
        true,
        generation,
        &mut |action| store.dispatch(action),
    )
    .await;

    let state = store.state();
    let groups = state
        .cached_meta_paths(disease_id, drug_id)
        .cloned()
        .unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    println!("\n=== Explanation paths: {} / {} ===\n", disease_id, drug_id);
    if state.meta_path_summaries.is_empty() {
        println!("No paths available.");
        return Ok(());
    }

    println!("{:<44} {:>6} {:>10}", "META PATH", "COUNT", "AVG SCORE");
    println!("{:-<64}", "");
    for summary in &state.meta_path_summaries {
        println!(
            "{:<44} {:>6} {:>10.3}",
            summary.node_types.join(" > "),
            summary.count,
            summary.avg_score
        );
    }

    for group in &groups {
        println!("\n{}:", group.node_types.join(" > "));
        for path in &group.paths {
            let route: Vec<&str> = path.nodes.iter().map(|n| n.node_id.as_str()).collect();
            let tag = if path.synthetic { " (synthetic)" } else { "" };
            println!("  {:>6.3}  {}{}", path.score, route.join(" > "), tag);
        }
    }
    Ok(())
}

async fn run_tree(
    client: &ApiClient,
    config: &Config,
    disease_id: &str,
    drug_id: &str,
    threshold: Option<f64>,
    max_children: Option<usize>,
    json: bool,
) -> Result<()> {
    let pair = client.attention_pair(disease_id, drug_id).await;
    let threshold = threshold.unwrap_or(config.explorer.edge_threshold);
    let max_children = max_children.unwrap_or(config.explorer.max_tree_children);

    let mut anchors: Vec<&String> = pair.attention.keys().collect();
    anchors.sort();
    let pruned: Vec<(String, AttentionTree)> = anchors
        .into_iter()
        .map(|anchor| {
            (
                anchor.clone(),
                prune_edge(&pair.attention[anchor], threshold, Some(max_children)),
            )
        })
        .collect();

    if json {
        let map: AttentionMap = pruned.into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!(
        "\n=== Attention trees: {} / {} (threshold {}, max children {}) ===",
        disease_id, drug_id, threshold, max_children
    );
    if pruned.is_empty() {
        println!("\nNo attention data available.");
        return Ok(());
    }
    for (anchor, tree) in &pruned {
        println!("\n[{}]", anchor);
        print_tree(tree, 0);
        println!("visible nodes: {}", flat_tree(tree).join(", "));
    }
    Ok(())
}

fn print_tree(node: &AttentionTree, depth: usize) {
    let indent = "  ".repeat(depth);
    if node.edge_info.is_empty() {
        println!(
            "{}{} ({}, score {:.3})",
            indent, node.node_id, node.node_type, node.score
        );
    } else {
        println!(
            "{}{} ({}, score {:.3}, via {})",
            indent, node.node_id, node.node_type, node.score, node.edge_info
        );
    }
    for child in &node.children {
        print_tree(child, depth + 1);
    }
}
