//! CLI command implementations.
//!
//! Every demo is split into a report builder, which runs the analyses and
//! returns a serializable value, and a printer for the text output.

use colored::Colorize;
use serde::Serialize;
use tracing::info;
use trellis_graph::{
    AnalysisConfig, Bridge, Cell, CommunityLabels, DegreeScore, EdgeScore, GraphStats, GraphStore,
    GridMap, GridPath, ItemId, PageRank, Path, Recommendation, Recommender, SpanningTree, UserId,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Seconds of green light per connected road.
const GREEN_SECONDS_PER_ROAD: usize = 10;

// ── Scenarios ───────────────────────────────────────────────────────────────

fn undirected(
    vertices: usize,
    edges: &[(usize, usize, f64)],
) -> trellis_graph::Result<GraphStore> {
    let mut graph = GraphStore::new();
    graph.add_vertices(vertices);
    for &(u, v, w) in edges {
        graph.add_undirected_edge(u, v, w)?;
    }
    Ok(graph)
}

fn city_roads() -> trellis_graph::Result<GraphStore> {
    undirected(
        6,
        &[
            (0, 1, 5.0),
            (0, 2, 3.0),
            (1, 2, 2.0),
            (1, 3, 6.0),
            (2, 3, 7.0),
            (3, 4, 4.0),
            (4, 5, 1.0),
        ],
    )
}

fn computer_network() -> trellis_graph::Result<GraphStore> {
    undirected(
        6,
        &[
            (0, 1, 4.0),
            (0, 2, 3.0),
            (1, 2, 1.0),
            (1, 3, 2.0),
            (3, 4, 5.0),
            (4, 5, 6.0),
        ],
    )
}

fn friendships() -> trellis_graph::Result<GraphStore> {
    undirected(
        6,
        &[
            (0, 1, 1.0),
            (0, 2, 1.0),
            (1, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
        ],
    )
}

fn shop() -> trellis_graph::Result<Recommender> {
    let mut rec = Recommender::new();
    for _ in 0..3 {
        rec.add_user();
    }
    for _ in 0..4 {
        rec.add_item();
    }
    for (user, item) in [(0, 0), (0, 1), (1, 1), (1, 2), (2, 0), (2, 2), (2, 3)] {
        rec.add_interaction(user, item)?;
    }
    Ok(rec)
}

fn game_grid() -> trellis_graph::Result<GridMap> {
    let mut grid = GridMap::new(5, 5);
    for col in 1..=3 {
        grid.mark_obstacle((1, col))?;
    }
    Ok(grid)
}

// ── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SignalTiming {
    intersection: usize,
    green_seconds: usize,
}

#[derive(Debug, Serialize)]
struct CityReport {
    from: usize,
    to: usize,
    route: Option<Path>,
    bottlenecks: Vec<EdgeScore>,
    signal_timings: Vec<SignalTiming>,
}

fn city_report() -> Result<CityReport> {
    let graph = city_roads()?;
    let (from, to) = (0, 5);
    let route = graph.shortest_path(from, to)?;
    let bottlenecks = graph.edge_betweenness().ranked();

    let signal_timings = (0..graph.vertex_count())
        .map(|v| {
            graph.degree(v).map(|degree| SignalTiming {
                intersection: v,
                green_seconds: degree * GREEN_SECONDS_PER_ROAD,
            })
        })
        .collect::<trellis_graph::Result<Vec<_>>>()?;

    Ok(CityReport {
        from,
        to,
        route,
        bottlenecks,
        signal_timings,
    })
}

#[derive(Debug, Serialize)]
struct NetworkReport {
    stats: GraphStats,
    critical_links: Vec<Bridge>,
    cabling: SpanningTree,
}

fn network_report() -> Result<NetworkReport> {
    let graph = computer_network()?;
    Ok(NetworkReport {
        stats: graph.stats(),
        critical_links: graph.bridges(),
        cabling: graph.minimum_spanning_tree(0)?,
    })
}

#[derive(Debug, Serialize)]
struct SocialReport {
    degree: Vec<DegreeScore>,
    friend_groups: Vec<Vec<usize>>,
    communities: CommunityLabels,
    influence: PageRank,
}

fn social_report(config: &AnalysisConfig) -> Result<SocialReport> {
    let graph = friendships()?;
    Ok(SocialReport {
        degree: graph.degree_centrality(),
        friend_groups: graph.component_communities(),
        communities: graph.label_propagation(config.community.max_rounds),
        influence: graph.page_rank(&config.page_rank)?,
    })
}

#[derive(Debug, Serialize)]
struct RecommendReport {
    user: UserId,
    interactions: Vec<ItemId>,
    recommendations: Vec<Recommendation>,
}

fn recommend_report(user: UserId) -> Result<RecommendReport> {
    let rec = shop()?;
    let recommendations = rec.recommend(user)?;
    Ok(RecommendReport {
        user,
        interactions: rec.interactions(user)?.to_vec(),
        recommendations,
    })
}

#[derive(Debug, Serialize)]
struct GridReport {
    map: String,
    start: Cell,
    goal: Cell,
    path: Option<GridPath>,
}

fn grid_report() -> Result<GridReport> {
    let grid = game_grid()?;
    let (start, goal) = (Cell::new(0, 0), Cell::new(4, 4));
    Ok(GridReport {
        map: grid.render(),
        start,
        goal,
        path: grid.find_path(start, goal)?,
    })
}

// ── Commands ────────────────────────────────────────────────────────────────

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join(items: impl IntoIterator<Item = impl ToString>, sep: &str) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// City road analysis.
pub fn city(json_output: bool) -> Result<()> {
    let report = city_report()?;
    if json_output {
        return print_json(&report);
    }

    println!("{}", "City Roads".cyan().bold());
    println!();

    println!("{}", "Traffic bottlenecks (edge betweenness):".yellow());
    for edge in &report.bottlenecks {
        println!("  {} - {}: {}", edge.u, edge.v, format!("{:.2}", edge.score).bold());
    }
    println!();

    println!("{}", "Signal timing suggestions:".yellow());
    for timing in &report.signal_timings {
        println!(
            "  Intersection {}: {} seconds green",
            timing.intersection, timing.green_seconds
        );
    }
    println!();

    match &report.route {
        Some(route) => println!(
            "{} Route {} -> {} (distance {}): {}",
            "✓".green(),
            report.from,
            report.to,
            route.cost.to_string().cyan(),
            join(&route.vertices, " -> ")
        ),
        None => println!(
            "{} No route from {} to {}",
            "✗".red(),
            report.from,
            report.to
        ),
    }

    Ok(())
}

/// Computer network analysis.
pub fn network(json_output: bool) -> Result<()> {
    let report = network_report()?;
    if json_output {
        return print_json(&report);
    }

    println!("{}", "Computer Network".cyan().bold());
    println!(
        "  {} {}  {} {}",
        "Devices:".dimmed(),
        report.stats.vertex_count,
        "Links:".dimmed(),
        report.stats.edge_count
    );
    println!();

    if report.critical_links.is_empty() {
        println!("{} No single link failure splits the network", "✓".green());
    } else {
        println!("{}", "Critical links:".red());
        for link in &report.critical_links {
            println!("  • {} - {}", link.from, link.to);
        }
    }
    println!();

    let tree = &report.cabling;
    println!("{}", "Minimum cabling (spanning tree):".yellow());
    for edge in &tree.edges {
        println!("  {} - {} (cost {})", edge.parent, edge.child, edge.weight);
    }
    println!(
        "  Total cost: {}",
        tree.total_weight.to_string().cyan().bold()
    );
    if !tree.is_spanning() {
        println!(
            "  {} Unreached devices: {}",
            "⚠".yellow(),
            join(&tree.unreached, ", ")
        );
    }

    Ok(())
}

/// Social network analysis.
pub fn social(config: &AnalysisConfig, json_output: bool) -> Result<()> {
    let report = social_report(config)?;
    if json_output {
        return print_json(&report);
    }

    println!("{}", "Social Network".cyan().bold());
    println!();

    println!("{}", "Degree centrality:".yellow());
    for score in &report.degree {
        println!("  Person {}: {} friends", score.vertex, score.degree);
    }
    println!();

    println!("{}", "Friend groups (connected components):".yellow());
    for (i, group) in report.friend_groups.iter().enumerate() {
        println!("  Group {}: {}", i + 1, join(group, ", "));
    }
    println!();

    let labels = &report.communities;
    println!(
        "{} ({} rounds{})",
        "Communities (label propagation):".yellow(),
        labels.rounds,
        if labels.converged { "" } else { ", not converged" }
    );
    for (i, members) in labels.communities().iter().enumerate() {
        println!("  Community {}: {}", i + 1, join(members, ", "));
    }
    println!();

    println!(
        "{} ({} iterations)",
        "Influence (PageRank):".yellow(),
        report.influence.iterations
    );
    for (person, score) in report.influence.ranked() {
        println!("  Person {}: {:.4}", person, score);
    }

    Ok(())
}

/// Item recommendations for one user.
pub fn recommend(user: UserId, json_output: bool) -> Result<()> {
    let report = recommend_report(user)?;
    if json_output {
        return print_json(&report);
    }

    println!("{}", "Recommendations".cyan().bold());
    println!(
        "  User {} has seen items: {}",
        report.user,
        join(&report.interactions, ", ")
    );
    println!();

    if report.recommendations.is_empty() {
        println!("No recommendations for user {}", report.user);
        return Ok(());
    }
    for rec in &report.recommendations {
        println!(
            "  Item {} with score {}",
            rec.item.to_string().cyan(),
            rec.score
        );
    }

    Ok(())
}

/// NPC pathfinding on the game grid.
pub fn grid(json_output: bool) -> Result<()> {
    let report = grid_report()?;
    if json_output {
        return print_json(&report);
    }

    println!("{}", "Game Grid".cyan().bold());
    print!("{}", report.map);
    println!();

    match &report.path {
        Some(path) => {
            println!(
                "{} Path {} -> {} (cost {}):",
                "✓".green(),
                report.start,
                report.goal,
                path.cost.to_string().cyan()
            );
            println!("  {}", join(&path.cells, " -> "));
        }
        None => println!(
            "{} No path from {} to {}",
            "✗".red(),
            report.start,
            report.goal
        ),
    }

    Ok(())
}

/// Run every demo.
pub fn all(config: &AnalysisConfig, json_output: bool) -> Result<()> {
    if json_output {
        let output = serde_json::json!({
            "city": city_report()?,
            "network": network_report()?,
            "social": social_report(config)?,
            "recommend": recommend_report(0)?,
            "grid": grid_report()?,
        });
        return print_json(&output);
    }

    info!("running all demos");
    city(false)?;
    println!();
    network(false)?;
    println!();
    social(config, false)?;
    println!();
    recommend(0, false)?;
    println!();
    grid(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_route() {
        let report = city_report().unwrap();
        let route = report.route.unwrap();
        assert_eq!(route.vertices, vec![0, 2, 3, 4, 5]);
        assert_eq!(route.cost, 15.0);

        let greens: Vec<usize> = report.signal_timings.iter().map(|t| t.green_seconds).collect();
        assert_eq!(greens, vec![20, 30, 30, 30, 20, 10]);
    }

    #[test]
    fn test_network_report() {
        let report = network_report().unwrap();
        assert_eq!(report.critical_links.len(), 3);
        assert_eq!(report.cabling.total_weight, 17.0);
    }

    #[test]
    fn test_social_report_uses_config() {
        let mut config = AnalysisConfig::default();
        config.page_rank.iterations = 3;
        config.community.max_rounds = 1;

        let report = social_report(&config).unwrap();
        assert_eq!(report.influence.iterations, 3);
        assert_eq!(report.communities.rounds, 1);
        assert_eq!(report.friend_groups.len(), 2);
    }

    #[test]
    fn test_recommend_report() {
        let report = recommend_report(0).unwrap();
        assert_eq!(report.interactions, vec![0, 1]);
        assert_eq!(report.recommendations[0].item, 2);
        assert!(recommend_report(3).is_err());
    }

    #[test]
    fn test_grid_report_json() {
        let report = grid_report().unwrap();
        assert_eq!(report.path.as_ref().map(|p| p.cost), Some(8));

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["start"]["row"], 0);
        assert_eq!(value["goal"]["col"], 4);
    }
}
