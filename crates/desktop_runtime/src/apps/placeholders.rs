//! Stand-in apps for desktop entries whose real implementation lives outside this workspace.

use desktop_app_contract::ManagedApp;
use leptos::*;

/// Renders the app's label and template key.
pub(super) struct PlaceholderApp {
    label: String,
    template: String,
}

impl PlaceholderApp {
    pub(super) fn new(label: String, template: String) -> Self {
        Self { label, template }
    }
}

impl ManagedApp for PlaceholderApp {
    fn view(&self) -> View {
        let label = self.label.clone();
        let class_name = format!("app-shell app-{}-shell", self.template);
        view! {
            <div class=class_name>
                <div class="app-placeholder-card">
                    <p><strong>{label}</strong></p>
                    <p>"Coming soon."</p>
                </div>
            </div>
        }
        .into_view()
    }
}
