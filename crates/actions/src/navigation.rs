use crate::form::ActionState;

/// The invoice list view that every invoice mutation invalidates and returns to.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

/// Where a successful sign-in lands.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// The hosting layer's view cache. Actions call it after a successful write so
/// the next request for `path` is recomputed.
pub trait Navigator: Send + Sync {
    fn revalidate_path(&self, path: &str);
}

/// The result of a mutation action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The write succeeded; navigate to this path.
    Redirect(String),
    /// Nothing was written; show this state on the form.
    Rejected(ActionState),
}

impl ActionOutcome {
    /// Marks `path` stale and produces the redirect to it.
    pub(crate) fn revalidate_and_redirect(navigator: &dyn Navigator, path: &str) -> Self {
        navigator.revalidate_path(path);
        ActionOutcome::Redirect(path.to_string())
    }
}
