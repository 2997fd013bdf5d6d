use super::{Plugin, PluginState};
use crate::node::{Node, Nodes};
use crate::port::Port;
use lv2kit_logger::Diagnostic;
use lv2kit_store::Term;
use std::sync::Arc;

/// Declared `lv2:minimum`, `lv2:maximum` and `lv2:default` per port index
///
/// Undeclared values and empty slots are `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortRanges {
    pub minimum: Vec<f32>,
    pub maximum: Vec<f32>,
    pub default: Vec<f32>,
}

/// Slots allowed per declared port before an index counts as out of range
const SLOTS_PER_PORT: usize = 16;
const MIN_SLOTS: usize = 256;

enum PortError {
    Symbol,
    Index,
    OutOfRange { index: u32, ports: usize },
}

impl Plugin {
    /// Port table, built on first use and never rebuilt
    pub(crate) fn ensure_ports<'s>(&self, state: &'s mut PluginState) -> &'s [Option<Arc<Port>>] {
        self.load(state);
        let ports = state.ports.get_or_insert_with(|| match self.build_ports() {
            Ok(ports) => ports,
            Err(PortError::Symbol) => {
                self.shared.diagnose(Diagnostic::error(format!(
                    "Plugin {} port has a missing or non-string symbol",
                    self.uri.turtle_token()
                )));
                Vec::new()
            }
            Err(PortError::Index) => {
                self.shared.diagnose(Diagnostic::error(format!(
                    "Plugin {} port has a non-integer index",
                    self.uri.turtle_token()
                )));
                Vec::new()
            }
            Err(PortError::OutOfRange { index, ports }) => {
                self.shared.diagnose(Diagnostic::error(format!(
                    "Plugin {} port index {} is out of range for {} ports",
                    self.uri.turtle_token(),
                    index,
                    ports
                )));
                Vec::new()
            }
        });
        ports.as_slice()
    }

    fn build_ports(&self) -> Result<Vec<Option<Arc<Port>>>, PortError> {
        let shared = &self.shared;
        let terms = &shared.terms;

        let declared = shared.values(&self.subject, &terms.lv2_port);
        let num_declared = declared.len();
        let max_slots = num_declared.saturating_mul(SLOTS_PER_PORT).max(MIN_SLOTS);

        let mut table: Vec<Option<Port>> = Vec::new();
        for node in declared {
            let subject = node.to_term();
            let symbol = shared
                .unique_value(&subject, &terms.lv2_symbol)
                .filter(Node::is_string)
                .ok_or(PortError::Symbol)?;
            let index = shared
                .unique_value(&subject, &terms.lv2_index)
                .and_then(|index| index.as_int())
                .and_then(|index| u32::try_from(index).ok())
                .ok_or(PortError::Index)?;

            let slot = index as usize;
            if slot >= max_slots {
                return Err(PortError::OutOfRange {
                    index,
                    ports: num_declared,
                });
            }
            if table.len() <= slot {
                table.resize_with(slot + 1, || None);
            }
            let port = table[slot].get_or_insert_with(|| Port::new(node.clone(), index, symbol));

            for class in shared.values(&subject, &terms.rdf_type) {
                if !class.is_uri() {
                    shared.diagnose(Diagnostic::warning(format!(
                        "Port {} of {} has a non-URI rdf:type",
                        port.symbol,
                        self.uri.turtle_token()
                    )));
                } else if !port.classes.contains(&class) {
                    port.classes.push(class);
                }
            }
        }

        Ok(table.into_iter().map(|port| port.map(Arc::new)).collect())
    }

    /// Port table slots; indices never declared are `None`
    pub fn ports(&self) -> Vec<Option<Arc<Port>>> {
        let mut state = self.state.lock();
        self.ensure_ports(&mut state).to_vec()
    }

    /// Length of the port table (highest index + 1)
    pub fn num_ports(&self) -> u32 {
        let mut state = self.state.lock();
        self.ensure_ports(&mut state).len() as u32
    }

    pub fn port_by_index(&self, index: u32) -> Option<Arc<Port>> {
        let mut state = self.state.lock();
        self.ensure_ports(&mut state)
            .get(index as usize)
            .and_then(Clone::clone)
    }

    pub fn port_by_symbol(&self, symbol: &str) -> Option<Arc<Port>> {
        let mut state = self.state.lock();
        self.ensure_ports(&mut state)
            .iter()
            .flatten()
            .find(|port| port.symbol.as_str() == Some(symbol))
            .cloned()
    }

    /// Number of ports that are instances of every class in `classes`
    pub fn num_ports_of_class(&self, classes: &[Node]) -> u32 {
        if classes.is_empty() {
            self.shared.diagnose(Diagnostic::error(
                "num_ports_of_class needs at least one class",
            ));
            return 0;
        }
        let mut state = self.state.lock();
        self.ensure_ports(&mut state)
            .iter()
            .flatten()
            .filter(|port| classes.iter().all(|class| port.is_a(class)))
            .count() as u32
    }

    /// All values of `predicate` on `port`
    pub fn port_value(&self, port: &Port, predicate: &Node) -> Option<Nodes> {
        self.value_for_subject(port.node(), predicate)
    }

    pub fn port_ranges_float(&self) -> PortRanges {
        let ports = self.ports();
        let terms = &self.shared.terms;
        let value = |subject: &Term, predicate: &Term| {
            self.shared
                .first_value(subject, predicate)
                .and_then(|v| v.as_float())
                .map_or(f32::NAN, |v| v as f32)
        };

        let mut ranges = PortRanges::default();
        for slot in &ports {
            let (min, max, default) = match slot {
                Some(port) => {
                    let subject = port.node.to_term();
                    (
                        value(&subject, &terms.lv2_minimum),
                        value(&subject, &terms.lv2_maximum),
                        value(&subject, &terms.lv2_default),
                    )
                }
                None => (f32::NAN, f32::NAN, f32::NAN),
            };
            ranges.minimum.push(min);
            ranges.maximum.push(max);
            ranges.default.push(default);
        }
        ranges
    }

    /// Port subjects tagged `lv2:portProperty lv2:reportsLatency`
    fn latency_ports(&self) -> Vec<Term> {
        self.ensure_loaded();
        let terms = &self.shared.terms;
        self.shared
            .values(&self.subject, &terms.lv2_port)
            .iter()
            .map(Node::to_term)
            .filter(|port| {
                self.shared
                    .ask(port, &terms.lv2_port_property, &terms.lv2_reports_latency)
            })
            .collect()
    }

    pub fn has_latency(&self) -> bool {
        !self.latency_ports().is_empty()
    }

    /// Index of the first port reporting latency
    pub fn latency_port_index(&self) -> Option<u32> {
        let port = self.latency_ports().into_iter().next()?;
        let index = self
            .shared
            .unique_value(&port, &self.shared.terms.lv2_index)?;
        let index = index.as_int().and_then(|i| u32::try_from(i).ok());
        if index.is_none() {
            self.shared.diagnose(Diagnostic::warning(format!(
                "Latency port of {} has a non-integer index",
                self.uri.turtle_token()
            )));
        }
        index
    }
}
