use super::Plugin;
use crate::node::Node;
use crate::ui::Ui;
use lv2kit_logger::Diagnostic;

impl Plugin {
    /// UIs declared with `ui:ui`
    ///
    /// Malformed entries are reported and skipped. `None` when no valid UI
    /// remains.
    pub fn uis(&self) -> Option<Vec<Ui>> {
        self.ensure_loaded();
        let uis: Vec<Ui> = self
            .shared
            .values(&self.subject, &self.shared.terms.ui_ui)
            .into_iter()
            .filter_map(|ui| {
                let parsed = self.read_ui(&ui);
                if parsed.is_none() {
                    self.shared.diagnose(Diagnostic::error(format!(
                        "Corrupt UI {} on plugin {}",
                        ui.turtle_token(),
                        self.uri.turtle_token()
                    )));
                }
                parsed
            })
            .collect();

        if uis.is_empty() {
            None
        } else {
            Some(uis)
        }
    }

    fn read_ui(&self, ui: &Node) -> Option<Ui> {
        if !ui.is_uri() {
            return None;
        }
        let subject = ui.to_term();
        let terms = &self.shared.terms;
        let class = self
            .shared
            .unique_value(&subject, &terms.rdf_type)
            .filter(Node::is_uri)?;
        let binary = self
            .shared
            .unique_value(&subject, &terms.ui_binary)
            .filter(Node::is_uri)?;
        Some(Ui {
            uri: ui.clone(),
            class,
            binary,
        })
    }

    pub fn ui_by_uri(&self, uri: &Node) -> Option<Ui> {
        self.uis()?.into_iter().find(|ui| ui.uri() == uri)
    }
}
