use super::*;
use crate::*;

impl RunState {
    /// Moves to a reachable map node and enters the phase it stands for.
    /// Rejected moves leave the run untouched.
    pub fn select_node(&mut self, node_id: u32, events: &mut EventBus) -> Result<NodeKind, RunError> {
        self.require_phase(GamePhase::Exploration)?;
        let kind = self
            .map
            .node(node_id)
            .map(|node| node.kind)
            .ok_or(RunError::UnknownNode(node_id))?;
        if !self.map.is_accessible(node_id) {
            log::warn!("node {node_id} is not reachable from {:?}", self.map.current);
            return Err(RunError::NodeInaccessible(node_id));
        }
        self.map.visit(node_id);
        log::info!("moved to node {node_id} ({kind:?})");

        match kind {
            NodeKind::Combat => {
                self.change_phase(GamePhase::Combat, PhaseOptions::combat(EnemyTier::Normal), events)?
            }
            NodeKind::Elite => {
                self.change_phase(GamePhase::Combat, PhaseOptions::combat(EnemyTier::Elite), events)?
            }
            NodeKind::Boss => {
                self.change_phase(GamePhase::Combat, PhaseOptions::combat(EnemyTier::Boss), events)?
            }
            NodeKind::Event => self.change_phase(GamePhase::Event, PhaseOptions::event(), events)?,
            NodeKind::Shop => self.change_phase(GamePhase::Shop, PhaseOptions::default(), events)?,
            NodeKind::Rest => self.change_phase(GamePhase::Rest, PhaseOptions::default(), events)?,
            NodeKind::Start => {}
        }
        Ok(kind)
    }
}
