//! `RequestState` and `Hop` (`spec.md` §3).

/// The kind of component a [`Hop`] was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Generator,
    Client,
    Edge,
    Server,
    LoadBalancer,
}

/// An immutable arrival record appended at every actor a request visits
/// (`spec.md` §3 "Hop"). `component_id` is an `Rc<str>` rather than an owned
/// `String` so appending a hop never allocates beyond the initial id intern.
#[derive(Debug, Clone, PartialEq)]
pub struct Hop {
    pub kind: ComponentKind,
    pub component_id: std::rc::Rc<str>,
    pub timestamp: f64,
}

/// A request moving through the topology. Exclusive ownership transfers from
/// actor to actor via mailbox messages — it is never shared (`spec.md` §9
/// "Request ownership").
#[derive(Debug, Clone)]
pub struct RequestState {
    pub id: u64,
    pub initial_time: f64,
    pub finish_time: Option<f64>,
    pub history: Vec<Hop>,
}

impl RequestState {
    pub fn new(id: u64, initial_time: f64, generator_component_id: std::rc::Rc<str>) -> Self {
        Self {
            id,
            initial_time,
            finish_time: None,
            history: vec![Hop {
                kind: ComponentKind::Generator,
                component_id: generator_component_id,
                timestamp: initial_time,
            }],
        }
    }

    pub fn record_hop(&mut self, kind: ComponentKind, component_id: std::rc::Rc<str>, at: f64) {
        self.history.push(Hop {
            kind,
            component_id,
            timestamp: at,
        });
    }

    /// The most recent node hop (generator/client/load-balancer/server)
    /// recorded before the current one, skipping over transport-only edge
    /// hops in between — used by the client runtime's relay/terminate rule
    /// (`spec.md` §4.11, §9 "fragile client terminal rule"). Edge hops sit
    /// between every pair of node hops, so a plain `history[-2]` lookup would
    /// find the edge the request just arrived on rather than the node it
    /// came from.
    pub fn previous_node_hop(&self) -> Option<&Hop> {
        self.history
            .iter()
            .rev()
            .skip(1)
            .find(|hop| hop.kind != ComponentKind::Edge)
    }

    pub fn finish(&mut self, at: f64) {
        self.finish_time = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn previous_node_hop_skips_the_edge_just_arrived_on() {
        let gen_id: Rc<str> = Rc::from("gen");
        let mut state = RequestState::new(1, 0.0, gen_id);

        // First client arrival: Generator -> Edge -> Client.
        state.record_hop(ComponentKind::Edge, Rc::from("gen_client"), 0.01);
        state.record_hop(ComponentKind::Client, Rc::from("client"), 0.02);
        assert_eq!(
            state.previous_node_hop().map(|h| h.kind),
            Some(ComponentKind::Generator)
        );

        // Relayed to a server and back: ... -> Edge -> Server -> Edge -> Client.
        state.record_hop(ComponentKind::Edge, Rc::from("client_srv1"), 0.03);
        state.record_hop(ComponentKind::Server, Rc::from("srv1"), 0.04);
        state.record_hop(ComponentKind::Edge, Rc::from("srv1_client"), 0.05);
        state.record_hop(ComponentKind::Client, Rc::from("client"), 0.06);
        assert_eq!(
            state.previous_node_hop().map(|h| h.kind),
            Some(ComponentKind::Server)
        );
    }

    #[test]
    fn previous_node_hop_is_none_with_only_one_hop() {
        let state = RequestState::new(1, 0.0, Rc::from("gen"));
        assert!(state.previous_node_hop().is_none());
    }
}
