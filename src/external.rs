//! Opening a task outside the list
//!
//! A plan lists app schemes worth trying and a web fallback; the opener
//! decides how much of it the platform can carry out.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;

use crate::models::Task;

pub const APP_SCHEME_TIMEOUT_MS: u32 = 800;
const TODOIST_WEB_TASK: &str = "https://todoist.com/app/task/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLinkPlan {
    pub schemes: Vec<String>,
    pub timeout_ms: u32,
    pub fallback: String,
}

impl DeepLinkPlan {
    pub fn for_task(task: &Task) -> Self {
        let fallback = task
            .url
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("{}{}", TODOIST_WEB_TASK, task.id));
        Self {
            schemes: vec![format!("todoist://task?id={}", task.id)],
            timeout_ms: APP_SCHEME_TIMEOUT_MS,
            fallback,
        }
    }
}

pub trait ExternalOpener {
    /// Carry out `plan`; returns the app schemes that were attempted
    fn open_externally(&self, plan: &DeepLinkPlan) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserOpener {
    /// Try the native app before the web page
    pub try_app_schemes: bool,
}

impl BrowserOpener {
    /// App scheme to try before the fallback, if probing is enabled
    pub fn app_scheme<'a>(&self, plan: &'a DeepLinkPlan) -> Option<&'a String> {
        plan.schemes.first().filter(|_| self.try_app_schemes)
    }
}

impl ExternalOpener for BrowserOpener {
    fn open_externally(&self, plan: &DeepLinkPlan) -> Vec<String> {
        let Some(scheme) = self.app_scheme(plan) else {
            open_in_new_tab(&plan.fallback);
            return Vec::new();
        };

        if let Some(win) = web_sys::window() {
            let _ = win.location().set_href(scheme);
        }
        // The page is hidden once the app takes over
        let fallback = plan.fallback.clone();
        Timeout::new(plan.timeout_ms, move || {
            let hidden = web_sys::window()
                .and_then(|w| w.document())
                .map(|d| d.hidden())
                .unwrap_or(false);
            if !hidden {
                open_in_new_tab(&fallback);
            }
        })
        .forget();
        vec![scheme.clone()]
    }
}

/// New tab without opener access; the current page navigates if the tab
/// cannot be opened
fn open_in_new_tab(url: &str) {
    let Some(win) = web_sys::window() else {
        return;
    };
    // a "noopener" feature string makes open() return null even on success
    let opened = win.open_with_url_and_target(url, "_blank");
    if tab_was_blocked(&opened) {
        let _ = win.location().set_href(url);
    } else if let Ok(Some(tab)) = opened {
        let _ = tab.set_opener(&JsValue::NULL);
    }
}

/// `window.open` yields no window when a popup blocker stops it
fn tab_was_blocked<W, E>(opened: &Result<Option<W>, E>) -> bool {
    !matches!(opened, Ok(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, url: Option<&str>) -> Task {
        serde_json::from_value(serde_json::json!({"id": id, "url": url})).unwrap()
    }

    #[test]
    fn test_plan_uses_task_url() {
        let plan = DeepLinkPlan::for_task(&task("12", Some("https://app.todoist.com/app/task/12")));
        assert_eq!(plan.schemes, vec!["todoist://task?id=12"]);
        assert_eq!(plan.timeout_ms, 800);
        assert_eq!(plan.fallback, "https://app.todoist.com/app/task/12");
    }

    #[test]
    fn test_plan_builds_web_url_without_task_url() {
        let plan = DeepLinkPlan::for_task(&task("12", None));
        assert_eq!(plan.fallback, "https://todoist.com/app/task/12");
    }

    #[test]
    fn test_app_scheme_only_when_enabled() {
        let plan = DeepLinkPlan::for_task(&task("12", None));
        assert_eq!(BrowserOpener::default().app_scheme(&plan), None);

        let opener = BrowserOpener { try_app_schemes: true };
        assert_eq!(
            opener.app_scheme(&plan).map(String::as_str),
            Some("todoist://task?id=12")
        );
    }

    #[test]
    fn test_blocked_popup_detected() {
        assert!(tab_was_blocked(&Ok::<Option<()>, ()>(None)));
        assert!(tab_was_blocked(&Err::<Option<()>, ()>(())));
        assert!(!tab_was_blocked(&Ok::<Option<()>, ()>(Some(()))));
    }
}
