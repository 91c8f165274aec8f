//! Contact and tie topology between part instances.
//!
//! Instances are graph nodes and every contact assignment or tie is an edge, so
//! the host can walk the graph once to create all interactions.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::assembly::{screw_instance_name, PartKind};
use crate::layout::ScrewInstance;

/// Sheets at or below this thickness get an eroding self-contact.
const EROSION_THICKNESS: f64 = 0.6 + 1.0e-9;
/// Friction between sheets and between sheet holes and the screw.
const SHEET_FRICTION: f64 = 0.25;
/// Friction on eroded sheet elements.
const EROSION_FRICTION: f64 = 4.0;

/// Contact property referenced by a contact assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "coefficient", rename_all = "snake_case")]
pub enum ContactProperty {
    /// Hard, frictionless normal behaviour.
    Frictionless,
    /// Hard normal behaviour with penalty friction.
    Friction(f64),
}

impl ContactProperty {
    /// Name of the property in the host model, e.g. `friction-25`.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            ContactProperty::Frictionless => "default".to_owned(),
            ContactProperty::Friction(mu) => format!("friction-{:02}", (mu * 100.0).round()),
        }
    }
}

/// Interaction between two surfaces, or of one surface with itself.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// Contact pair assigned within the general contact definition.
    Contact {
        /// First surface of the pair.
        first: String,
        /// Second surface of the pair.
        second: String,
        /// Assigned property.
        property: ContactProperty,
    },
    /// Self-contact of a surface whose elements may erode.
    SelfContact {
        /// Surface in contact with itself.
        surface: String,
        /// Assigned property.
        property: ContactProperty,
    },
    /// Tie constraint gluing a secondary surface to a main surface.
    Tie {
        /// Main surface.
        main: String,
        /// Secondary surface.
        secondary: String,
    },
}

impl Interaction {
    /// Whether the interaction is a tie constraint.
    #[must_use]
    pub fn is_tie(&self) -> bool {
        matches!(self, Interaction::Tie { .. })
    }
}

/// Node of the interaction graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstanceNode {
    /// Instance name in the host assembly.
    pub name: String,
    /// Source part.
    pub part: PartKind,
}

/// Interaction topology of one connection.
#[derive(Clone, Debug)]
pub struct InteractionGraph {
    /// Instances as nodes, interactions as edges.
    graph: Graph<InstanceNode, Interaction>,
    /// Lookup from instance name to node.
    nodes: HashMap<String, NodeIndex>,
    /// Property applied to every pair not listed explicitly.
    default_property: ContactProperty,
}

/// Surface of `instance` named `suffix`.
fn surface(instance: &str, suffix: &str) -> String {
    format!("{instance}-{suffix}")
}

impl InteractionGraph {
    /// Build the topology for two sheets joined by `screws`.
    ///
    /// # Examples
    /// ```
    /// use screwlayout::{InteractionGraph, ScrewInstance};
    ///
    /// let screw = ScrewInstance { row: 0, column: 0, x: 0.0, y: 0.0 };
    /// let graph = InteractionGraph::build(&[screw], 1.0, 1.0);
    /// assert_eq!(graph.instance_count(), 4);
    /// assert_eq!(graph.tie_count(), 1);
    /// ```
    #[must_use]
    pub fn build(screws: &[ScrewInstance], near_thickness: f64, far_thickness: f64) -> Self {
        let mut topology = Self {
            graph: Graph::new(),
            nodes: HashMap::new(),
            default_property: ContactProperty::Frictionless,
        };
        let friction = ContactProperty::Friction(SHEET_FRICTION);

        let near_name = PartKind::NearSheet.part_name();
        let far_name = PartKind::FarSheet.part_name();
        let near = topology.add_instance(near_name.to_owned(), PartKind::NearSheet);
        let far = topology.add_instance(far_name.to_owned(), PartKind::FarSheet);

        for (node, name, thickness) in [
            (near, near_name, near_thickness),
            (far, far_name, far_thickness),
        ] {
            if thickness <= EROSION_THICKNESS {
                topology.graph.add_edge(
                    node,
                    node,
                    Interaction::SelfContact {
                        surface: surface(name, "surfErode"),
                        property: ContactProperty::Friction(EROSION_FRICTION),
                    },
                );
            }
        }

        topology.graph.add_edge(
            near,
            far,
            Interaction::Contact {
                first: surface(near_name, "B"),
                second: surface(far_name, "A"),
                property: friction,
            },
        );

        for screw in screws {
            let screw_name = screw_instance_name(PartKind::Screw, screw);
            let thread_name = screw_instance_name(PartKind::Thread, screw);
            let body = topology.add_instance(screw_name.clone(), PartKind::Screw);
            let thread = topology.add_instance(thread_name.clone(), PartKind::Thread);
            let near_hole = surface(near_name, &screw.tag());
            let far_hole = surface(far_name, &screw.tag());

            let washer = surface(&screw_name, "c");
            let shank = surface(&screw_name, "b");
            let outer = surface(&thread_name, "O");
            let inner = surface(&thread_name, "I");

            let mut contact = |a: NodeIndex, first: String, b: NodeIndex, second: &str| {
                topology.graph.add_edge(
                    a,
                    b,
                    Interaction::Contact {
                        first,
                        second: second.to_owned(),
                        property: friction,
                    },
                );
            };

            contact(near, surface(&near_hole, "AA"), body, &washer);
            for band in ["AA", "MA", "BA"] {
                contact(near, surface(&near_hole, band), body, &shank);
                contact(near, surface(&near_hole, band), thread, &outer);
            }
            for band in ["MA", "BA"] {
                contact(body, shank.clone(), far, &surface(&far_hole, band));
                contact(thread, outer.clone(), far, &surface(&far_hole, band));
            }

            topology.graph.add_edge(
                thread,
                body,
                Interaction::Tie {
                    main: inner,
                    secondary: shank,
                },
            );
        }

        topology
    }

    fn add_instance(&mut self, name: String, part: PartKind) -> NodeIndex {
        let index = self.graph.add_node(InstanceNode {
            name: name.clone(),
            part,
        });
        self.nodes.insert(name, index);
        index
    }

    /// Property applied to all pairs without an explicit assignment.
    #[must_use]
    pub fn default_property(&self) -> ContactProperty {
        self.default_property
    }

    /// Number of part instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of interactions of any kind.
    #[must_use]
    pub fn interaction_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of tie constraints.
    #[must_use]
    pub fn tie_count(&self) -> usize {
        self.graph.edge_weights().filter(|edge| edge.is_tie()).count()
    }

    /// Node of the instance called `name`.
    #[must_use]
    pub fn instance(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.get(name).copied()
    }

    /// Interactions touching the instance called `name`, in either direction.
    #[must_use]
    pub fn interactions_of(&self, name: &str) -> Vec<&Interaction> {
        let Some(node) = self.instance(name) else {
            return Vec::new();
        };
        let mut edges: Vec<EdgeIndex> = self
            .graph
            .edges_directed(node, petgraph::Direction::Outgoing)
            .chain(self.graph.edges_directed(node, petgraph::Direction::Incoming))
            .map(|edge| edge.id())
            .collect();
        edges.sort_unstable();
        edges.dedup();
        edges.into_iter().map(|edge| &self.graph[edge]).collect()
    }

    /// Every interaction with the names of the instances it connects.
    #[must_use]
    pub fn interactions(&self) -> Vec<(&str, &str, &Interaction)> {
        self.graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].name.as_str(),
                    self.graph[edge.target()].name.as_str(),
                    edge.weight(),
                )
            })
            .collect()
    }
}

impl Serialize for InteractionGraph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let instances: Vec<&InstanceNode> = self.graph.node_weights().collect();
        let interactions: Vec<&Interaction> = self.graph.edge_weights().collect();
        let mut state = serializer.serialize_struct("InteractionGraph", 3)?;
        state.serialize_field("default_property", &self.default_property)?;
        state.serialize_field("instances", &instances)?;
        state.serialize_field("interactions", &interactions)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screws(count: usize) -> Vec<ScrewInstance> {
        (0..count)
            .map(|row| ScrewInstance {
                row,
                column: 0,
                x: 0.0,
                y: row as f64 * 19.2,
            })
            .collect()
    }

    #[test]
    fn each_screw_adds_eleven_contacts_and_one_tie() {
        let graph = InteractionGraph::build(&screws(2), 1.0, 1.0);
        assert_eq!(graph.instance_count(), 6);
        assert_eq!(graph.interaction_count(), 1 + 2 * 12);
        assert_eq!(graph.tie_count(), 2);
    }

    #[test]
    fn thin_sheets_get_eroding_self_contact() {
        let thick = InteractionGraph::build(&screws(1), 1.0, 2.5);
        let thin = InteractionGraph::build(&screws(1), 0.6, 0.4);
        assert_eq!(thin.interaction_count(), thick.interaction_count() + 2);
        let self_contacts = thin
            .interactions_of("nearSheetPart")
            .into_iter()
            .filter(|edge| matches!(edge, Interaction::SelfContact { .. }))
            .count();
        assert_eq!(self_contacts, 1);
    }

    #[test]
    fn tie_binds_thread_inner_to_shank() {
        let graph = InteractionGraph::build(&screws(1), 1.0, 1.0);
        let tie = graph
            .interactions()
            .into_iter()
            .find(|(_, _, edge)| edge.is_tie())
            .expect("tie present");
        assert_eq!(tie.0, "threadPart-0_0");
        assert_eq!(tie.1, "screwPart-0_0");
        assert_eq!(
            tie.2,
            &Interaction::Tie {
                main: "threadPart-0_0-I".to_owned(),
                secondary: "screwPart-0_0-b".to_owned(),
            }
        );
    }

    #[test]
    fn property_names_follow_host_convention() {
        assert_eq!(ContactProperty::Frictionless.name(), "default");
        assert_eq!(ContactProperty::Friction(0.25).name(), "friction-25");
        assert_eq!(ContactProperty::Friction(4.0).name(), "friction-400");
    }

    #[test]
    fn unknown_instance_has_no_interactions() {
        let graph = InteractionGraph::build(&screws(1), 1.0, 1.0);
        assert!(graph.interactions_of("missing").is_empty());
        assert_eq!(graph.interactions_of("screwPart-0_0").len(), 4 + 2 + 1);
    }
}
