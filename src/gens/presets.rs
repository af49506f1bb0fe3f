/*!
# Presets

Ready-made input graphs. Every node carries a [`PresetNode`] with an optional label and the
position it is drawn at; the degree reduction itself only looks at ids and edges.

- [`Preset::Star`]: a centre with eight neighbors framed by border edges and eight outer tips,
- [`Preset::Square`]: the complete graph on four nodes,
- [`Preset::Germany`]: 27 German cities, each connected to its four nearest cities,
- [`Preset::Random`]: `8..16` nodes at random positions, each pair connected with a probability
  drawn from `[0.2, 0.4)`. This graph is not necessarily connected.
*/

use serde::{Deserialize, Serialize};

use super::*;

/// Payload of a preset node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PresetNode {
    pub label: Option<String>,
    pub position: Position,
}

impl PresetNode {
    fn at(x: f64, y: f64) -> Self {
        Self {
            label: None,
            position: Position::new(x, y),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    /// The cities of [`Preset::germany_cities`], each connected to its four nearest cities.
    /// The city data itself carries no edges: they are added by [`ConnectNearest`] while
    /// building, so the preset can be fed to the degree reduction right away.
    Germany,
    Star,
    Square,
    Random,
}

const GERMANY: [(&str, f64, f64); 27] = [
    ("Stralsund", 1077.0, -354.0),
    ("Potsdam", 1048.0, 113.0),
    ("Berlin", 1111.0, 32.0),
    ("Bremen", 515.0, -72.0),
    ("Bielefeld", 471.0, 158.0),
    ("Rostock", 938.0, -295.0),
    ("Dortmund", 327.0, 288.0),
    ("Kassel", 585.0, 308.0),
    ("Dresden", 1167.0, 372.0),
    ("Magdeburg", 891.0, 159.0),
    ("Düsseldorf", 234.0, 366.0),
    ("Kiel", 688.0, -350.0),
    ("Hamburg", 652.0, -175.0),
    ("Hannover", 631.0, 93.0),
    ("Lübeck", 764.0, -243.0),
    ("Essen", 238.0, 286.0),
    ("Leipzig", 968.0, 306.0),
    ("Stuttgart", 565.0, 839.0),
    ("Karlsruhe", 453.0, 808.0),
    ("Mannheim", 461.0, 697.0),
    ("Frankfurt am Main", 499.0, 571.0),
    ("Köln", 281.0, 432.0),
    ("Regensburg", 951.0, 790.0),
    ("Nürnberg", 810.0, 706.0),
    ("Flensburg", 607.0, -495.0),
    ("München", 884.0, 952.0),
    ("Freiburg im Breisgau", 392.0, 994.0),
];

const GERMANY_NEAREST: usize = 4;

const STAR_POSITIONS: [(f64, f64); 17] = [
    (200.0, 200.0),
    // inner ring
    (0.0, 0.0),
    (200.0, 50.0),
    (400.0, 0.0),
    (50.0, 200.0),
    (350.0, 200.0),
    (0.0, 400.0),
    (200.0, 350.0),
    (400.0, 400.0),
    // tips
    (0.0, -325.0),
    (0.0, 725.0),
    (400.0, -325.0),
    (400.0, 725.0),
    (-325.0, 0.0),
    (725.0, 0.0),
    (-325.0, 400.0),
    (725.0, 400.0),
];

const STAR_BORDERS: [(Node, Node); 8] = [
    (1, 2),
    (6, 7),
    (2, 3),
    (7, 8),
    (1, 4),
    (4, 6),
    (3, 5),
    (5, 8),
];

/// Every tip is connected to the two border nodes it sits between
const STAR_TIPS: [(Node, Node); 16] = [
    (1, 9),
    (2, 9),
    (2, 11),
    (3, 11),
    (3, 14),
    (5, 14),
    (5, 16),
    (8, 16),
    (8, 12),
    (7, 12),
    (7, 10),
    (6, 10),
    (6, 15),
    (4, 15),
    (4, 13),
    (1, 13),
];

const SQUARE_POSITIONS: [(f64, f64); 4] =
    [(0.0, 0.0), (0.0, 200.0), (200.0, 0.0), (200.0, 200.0)];

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Germany,
        Preset::Star,
        Preset::Square,
        Preset::Random,
    ];

    /// Builds the preset graph. Only [`Preset::Random`] draws from `rng`.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Result<Graph<PresetNode>, GraphError> {
        match self {
            Preset::Germany => Self::germany(),
            Preset::Star => Self::star(),
            Preset::Square => Self::square(),
            Preset::Random => Self::random(rng),
        }
    }

    /// The 27 labelled German cities of [`Preset::Germany`] without any edges
    pub fn germany_cities() -> Result<Graph<PresetNode>, GraphError> {
        Graph::with_nodes(GERMANY.iter().enumerate().map(|(u, &(city, x, y))| {
            (
                u as Node,
                PresetNode {
                    label: Some(city.to_string()),
                    position: Position::new(x, y),
                },
            )
        }))
    }

    fn germany() -> Result<Graph<PresetNode>, GraphError> {
        let mut graph = Self::germany_cities()?;
        let positions = positions_of(&graph);
        ConnectNearest::new(GERMANY_NEAREST).connect(&mut graph, &positions)?;
        Ok(graph)
    }

    fn star() -> Result<Graph<PresetNode>, GraphError> {
        let mut graph = with_positions(&STAR_POSITIONS)?;
        graph.connect_star(0, 1..=8)?;
        graph.add_edges(STAR_BORDERS)?;
        graph.add_edges(STAR_TIPS)?;
        Ok(graph)
    }

    fn square() -> Result<Graph<PresetNode>, GraphError> {
        let mut graph = with_positions(&SQUARE_POSITIONS)?;
        graph.connect_clique(graph.node_ids())?;
        Ok(graph)
    }

    fn random<R: Rng>(rng: &mut R) -> Result<Graph<PresetNode>, GraphError> {
        let n: NumNodes = 8 + rng.random_range(0..8);
        let p = rng.random_range(0.2..0.4);

        let mut graph = Graph::new();
        for u in 0..n {
            let x = rng.random::<f64>() * 1000.0;
            let y = rng.random::<f64>() * 1000.0;
            graph.add_node(u, PresetNode::at(x, y))?;
        }

        graph.add_edges(Gnp::new().nodes(n).prob(p).stream(rng))?;
        Ok(graph)
    }
}

/// Nodes `0..` at the given positions without labels and edges
fn with_positions(positions: &[(f64, f64)]) -> Result<Graph<PresetNode>, GraphError> {
    Graph::with_nodes(
        positions
            .iter()
            .enumerate()
            .map(|(u, &(x, y))| (u as Node, PresetNode::at(x, y))),
    )
}

/// Returns the position of every node in insertion order
pub fn positions_of(graph: &Graph<PresetNode>) -> Vec<(Node, Position)> {
    graph
        .vertices()
        .filter_map(|u| graph.data(u).map(|node| (u, node.position)))
        .collect()
}
