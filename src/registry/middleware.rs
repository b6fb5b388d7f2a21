use super::Registry;
use crate::metadata::Middleware;

pub type MiddlewareRegistry = Registry<Middleware>;

impl Registry<Middleware> {
    /// An empty middleware registry; there are no built-in middleware.
    #[must_use]
    pub fn empty() -> Self {
        Registry::new("middleware")
    }

    /// Global middleware in registration order: priority ascending, then name.
    #[must_use]
    pub fn globals_ordered(&self) -> Vec<&Middleware> {
        let mut globals: Vec<&Middleware> = self.iter().filter(|m| m.global).collect();
        globals.sort_by(|a, b| {
            a.effective_priority()
                .cmp(&b.effective_priority())
                .then_with(|| a.name.cmp(&b.name))
        });
        globals
    }
}
