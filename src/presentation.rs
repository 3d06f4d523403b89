// Presentation module
// Modal alerts and the window/view chain they are presented on

use log::{info, warn};
use std::cell::RefCell;
use std::fmt;

/// A button on an alert. Actions carry no handler, dismissing is all they do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAction {
    pub title: String,
}

/// A blocking informational dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub actions: Vec<AlertAction>,
}

impl Alert {
    /// Alert with a single "OK" button
    pub fn acknowledgement(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            actions: vec![AlertAction {
                title: "OK".to_string(),
            }],
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)?;
        for action in &self.actions {
            write!(f, " [{}]", action.title)?;
        }
        Ok(())
    }
}

/// Shows alerts to the user
pub trait AlertPresenter {
    fn present(&self, alert: Alert);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewContent {
    /// A regular screen, identified by label
    Screen(String),
    Alert(Alert),
}

/// A view and whatever it currently presents modally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub content: ViewContent,
    presented: Option<Box<View>>,
}

impl View {
    pub fn screen(label: impl Into<String>) -> Self {
        Self {
            content: ViewContent::Screen(label.into()),
            presented: None,
        }
    }

    /// Present `view` on top of this one, replacing any earlier child
    pub fn present(&mut self, view: View) {
        self.presented = Some(Box::new(view));
    }

    pub fn presented(&self) -> Option<&View> {
        self.presented.as_deref()
    }

    /// Last view in the presentation chain starting here
    pub fn topmost(&self) -> &View {
        let mut view = self;
        while let Some(child) = view.presented.as_deref() {
            view = child;
        }
        view
    }

    fn topmost_mut(&mut self) -> &mut View {
        match self.presented {
            Some(ref mut child) => child.topmost_mut(),
            None => self,
        }
    }
}

/// Remove the topmost presented view if it is an alert
fn dismiss_top_alert(view: &mut View) -> Option<Alert> {
    let child = view.presented.as_mut()?;
    if child.presented.is_some() {
        return dismiss_top_alert(child);
    }
    if !matches!(child.content, ViewContent::Alert(_)) {
        return None;
    }
    match view.presented.take().map(|child| child.content) {
        Some(ViewContent::Alert(alert)) => Some(alert),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    /// Whether this window receives input
    pub key: bool,
    pub root: Option<View>,
}

impl Window {
    pub fn key(root: View) -> Self {
        Self {
            key: true,
            root: Some(root),
        }
    }
}

/// The app's windows; alerts go on top of the key window's chain
#[derive(Debug, Default)]
pub struct WindowStack {
    windows: RefCell<Vec<Window>>,
}

impl WindowStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack with one key window showing `root`
    pub fn with_root(root: View) -> Self {
        let stack = Self::new();
        stack.add_window(Window::key(root));
        stack
    }

    pub fn add_window(&self, window: Window) {
        self.windows.borrow_mut().push(window);
    }

    /// Content of the topmost view in the key window
    pub fn topmost(&self) -> Option<ViewContent> {
        let windows = self.windows.borrow();
        let root = windows.iter().find(|w| w.key)?.root.as_ref()?;
        Some(root.topmost().content.clone())
    }

    /// Dismiss the topmost alert of the key window through its only action
    pub fn acknowledge(&self) -> Option<Alert> {
        let mut windows = self.windows.borrow_mut();
        let root = windows.iter_mut().find(|w| w.key)?.root.as_mut()?;
        let alert = dismiss_top_alert(root)?;
        info!("Alert \"{}\" dismissed", alert.title);
        Some(alert)
    }
}

impl AlertPresenter for WindowStack {
    fn present(&self, alert: Alert) {
        let mut windows = self.windows.borrow_mut();
        let Some(root) = windows
            .iter_mut()
            .find(|w| w.key)
            .and_then(|w| w.root.as_mut())
        else {
            warn!("No key window to present alert on: {}", alert);
            return;
        };
        info!("Presenting alert: {}", alert);
        root.topmost_mut().present(View {
            content: ViewContent::Alert(alert),
            presented: None,
        });
    }
}
