use crate::RngState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    Combat,
    Elite,
    Boss,
    Event,
    Shop,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapNode {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub child_ids: Vec<u32>,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub visited: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeWeight {
    pub kind: NodeKind,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapRule {
    /// Upper bound on nodes per level.
    pub width: usize,
    /// Levels including the start and boss levels.
    pub depth: u32,
    pub weights: Vec<NodeWeight>,
}

impl Default for MapRule {
    fn default() -> Self {
        Self {
            width: 4,
            depth: 5,
            weights: vec![
                NodeWeight { kind: NodeKind::Combat, weight: 0.55 },
                NodeWeight { kind: NodeKind::Elite, weight: 0.05 },
                NodeWeight { kind: NodeKind::Rest, weight: 0.15 },
                NodeWeight { kind: NodeKind::Event, weight: 0.15 },
                NodeWeight { kind: NodeKind::Shop, weight: 0.1 },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MapGraph {
    pub nodes: Vec<MapNode>,
    #[serde(default)]
    pub current: Option<u32>,
}

impl MapGraph {
    pub fn new(nodes: Vec<MapNode>) -> Self {
        Self {
            nodes,
            current: None,
        }
    }

    /// Layered graph: one start node, `depth - 2` random levels, one boss.
    /// Every node below the start has at least one parent.
    pub fn generate(rule: &MapRule, rng: &mut RngState) -> Self {
        let width = rule.width.max(2);
        let depth = rule.depth.max(2);
        let mut nodes = vec![MapNode {
            id: 1,
            kind: NodeKind::Start,
            child_ids: Vec::new(),
            level: 0,
            visited: false,
        }];
        let mut next_id = 2u32;
        let mut prev_level: Vec<usize> = vec![0];

        for level in 1..depth - 1 {
            let count = 2 + rng.index(width - 1).unwrap_or(0);
            let mut level_nodes = Vec::with_capacity(count);
            for _ in 0..count {
                let kind = pick_kind(&rule.weights, rng);
                nodes.push(MapNode {
                    id: next_id,
                    kind,
                    child_ids: Vec::new(),
                    level,
                    visited: false,
                });
                level_nodes.push(nodes.len() - 1);
                next_id += 1;
            }

            let mut has_parent = vec![false; level_nodes.len()];
            for &parent in &prev_level {
                let links = 1 + rng.index(2).unwrap_or(0);
                let mut candidates: Vec<usize> = (0..level_nodes.len()).collect();
                rng.shuffle(&mut candidates);
                for &slot in candidates.iter().take(links) {
                    let child_id = nodes[level_nodes[slot]].id;
                    nodes[parent].child_ids.push(child_id);
                    has_parent[slot] = true;
                }
            }
            for (slot, linked) in has_parent.iter().enumerate() {
                if *linked {
                    continue;
                }
                let parent = match rng.pick(&prev_level) {
                    Some(parent) => *parent,
                    None => 0,
                };
                let child_id = nodes[level_nodes[slot]].id;
                nodes[parent].child_ids.push(child_id);
            }
            prev_level = level_nodes;
        }

        let boss_id = next_id;
        for &parent in &prev_level {
            nodes[parent].child_ids.push(boss_id);
        }
        nodes.push(MapNode {
            id: boss_id,
            kind: NodeKind::Boss,
            child_ids: Vec::new(),
            level: depth - 1,
            visited: false,
        });
        Self::new(nodes)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: u32) -> Option<&MapNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn current_node(&self) -> Option<&MapNode> {
        self.current.and_then(|id| self.node(id))
    }

    /// Without a current node only the start node is reachable; otherwise
    /// only direct children of the current node are.
    pub fn is_accessible(&self, id: u32) -> bool {
        match self.current_node() {
            None => self
                .node(id)
                .map(|node| node.kind == NodeKind::Start)
                .unwrap_or(false),
            Some(current) => current.child_ids.contains(&id),
        }
    }

    pub fn accessible_ids(&self) -> Vec<u32> {
        match self.current_node() {
            None => self
                .nodes
                .iter()
                .filter(|node| node.kind == NodeKind::Start)
                .map(|node| node.id)
                .collect(),
            Some(current) => current.child_ids.clone(),
        }
    }

    pub fn visit(&mut self, id: u32) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            node.visited = true;
            self.current = Some(id);
        }
    }
}

fn pick_kind(weights: &[NodeWeight], rng: &mut RngState) -> NodeKind {
    let total: f64 = weights.iter().map(|w| w.weight.max(0.0)).sum();
    if total <= 0.0 {
        return NodeKind::Combat;
    }
    let mut roll = (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64 * total;
    for entry in weights {
        let weight = entry.weight.max(0.0);
        if roll < weight {
            return entry.kind;
        }
        roll -= weight;
    }
    NodeKind::Combat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_map_is_connected_from_start_to_boss() {
        let mut rng = RngState::from_seed(7);
        let map = MapGraph::generate(&MapRule::default(), &mut rng);
        assert_eq!(map.nodes[0].kind, NodeKind::Start);
        let boss = map.nodes.last().expect("boss node");
        assert_eq!(boss.kind, NodeKind::Boss);

        let mut seen = vec![map.nodes[0].id];
        let mut frontier = vec![map.nodes[0].id];
        while let Some(id) = frontier.pop() {
            for child in &map.node(id).expect("node").child_ids {
                if !seen.contains(child) {
                    seen.push(*child);
                    frontier.push(*child);
                }
            }
        }
        assert_eq!(seen.len(), map.nodes.len());
    }

    #[test]
    fn only_start_is_reachable_before_the_first_move() {
        let mut rng = RngState::from_seed(3);
        let mut map = MapGraph::generate(&MapRule::default(), &mut rng);
        assert!(map.is_accessible(1));
        let child = map.nodes[0].child_ids[0];
        assert!(!map.is_accessible(child));
        map.visit(1);
        assert!(map.is_accessible(child));
        assert!(!map.is_accessible(1));
    }
}
