//! The session's file/hour/timestamp choice and the view derived from it.

use shared_types::Timestamp;

use crate::error::SelectionError;

/// Upper bound on timestamps compared side by side.
pub const MAX_SELECTED_MINUTES: usize = 3;

/// File, hour and 1..=3 unique timestamps in the order they were picked.
/// Fixed once the analytics view is entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    file_name: String,
    hour: u32,
    minutes: Vec<Timestamp>,
}

impl Selection {
    pub fn new(
        file_name: impl Into<String>,
        hour: u32,
        minutes: Vec<Timestamp>,
    ) -> Result<Self, SelectionError> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(SelectionError::MissingFile);
        }
        if minutes.is_empty() {
            return Err(SelectionError::NoMinutes);
        }
        if minutes.len() > MAX_SELECTED_MINUTES {
            return Err(SelectionError::TooManyMinutes {
                max: MAX_SELECTED_MINUTES,
                got: minutes.len(),
            });
        }
        for (i, minute) in minutes.iter().enumerate() {
            if minutes[..i].contains(minute) {
                return Err(SelectionError::DuplicateMinute(minute.clone()));
            }
        }

        Ok(Self {
            file_name,
            hour,
            minutes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minutes(&self) -> &[Timestamp] {
        &self.minutes
    }

    pub fn is_comparative(&self) -> bool {
        self.minutes.len() > 1
    }
}

/// Minute toggling on the dashboard: click order, unique, capped at three.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinutePicker {
    picked: Vec<Timestamp>,
}

impl MinutePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `minute` is picked afterwards. A fourth pick is ignored.
    pub fn toggle(&mut self, minute: &str) -> bool {
        if let Some(pos) = self.picked.iter().position(|m| m == minute) {
            self.picked.remove(pos);
            return false;
        }
        if self.picked.len() < MAX_SELECTED_MINUTES {
            self.picked.push(minute.to_string());
            return true;
        }
        false
    }

    pub fn is_picked(&self, minute: &str) -> bool {
        self.picked.iter().any(|m| m == minute)
    }

    pub fn picked(&self) -> &[Timestamp] {
        &self.picked
    }

    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    pub fn clear(&mut self) {
        self.picked.clear();
    }

    pub(crate) fn replace(&mut self, minutes: &[Timestamp]) {
        self.picked = minutes
            .iter()
            .take(MAX_SELECTED_MINUTES)
            .cloned()
            .collect();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsView {
    Single,
    Comparative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    ComparativeAnalysis,
    ThreadSummaryCount,
    ThreadPoolStatistics,
    IdenticalStackTraces,
    LastExecutedMethods,
    BlockingThreads,
    GcThreads,
    StackLength,
    Deadlock,
}

impl Panel {
    const SINGLE: [Panel; 8] = [
        Panel::ThreadSummaryCount,
        Panel::ThreadPoolStatistics,
        Panel::IdenticalStackTraces,
        Panel::LastExecutedMethods,
        Panel::BlockingThreads,
        Panel::GcThreads,
        Panel::StackLength,
        Panel::Deadlock,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::ComparativeAnalysis => "Comparative Analysis",
            Panel::ThreadSummaryCount => "Thread Summary Count",
            Panel::ThreadPoolStatistics => "Thread Pool Statistics",
            Panel::IdenticalStackTraces => "Identical Stack Trace",
            Panel::LastExecutedMethods => "Last Executed Methods",
            Panel::BlockingThreads => "Blocking Threads",
            Panel::GcThreads => "GC Threads",
            Panel::StackLength => "Stack Length",
            Panel::Deadlock => "Deadlock",
        }
    }
}

/// Owns the selection for the analytics view and derives what is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewController {
    selection: Selection,
    active: usize,
    panel: Panel,
}

impl ViewController {
    pub fn new(selection: Selection) -> Self {
        let panel = if selection.is_comparative() {
            Panel::ComparativeAnalysis
        } else {
            Panel::ThreadSummaryCount
        };
        Self {
            selection,
            active: 0,
            panel,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_view(&self) -> AnalyticsView {
        if self.selection.is_comparative() {
            AnalyticsView::Comparative
        } else {
            AnalyticsView::Single
        }
    }

    pub fn active_timestamp(&self) -> &str {
        &self.selection.minutes[self.active]
    }

    /// Point single-timestamp panels at another selected minute. Returns
    /// whether anything changed.
    pub fn set_active_timestamp(&mut self, minute: &str) -> Result<bool, SelectionError> {
        let index = self
            .selection
            .minutes
            .iter()
            .position(|m| m == minute)
            .ok_or_else(|| SelectionError::UnknownMinute(minute.to_string()))?;
        let changed = index != self.active;
        self.active = index;
        Ok(changed)
    }

    /// The one-element timestamp set handed to single-timestamp panels.
    pub fn single_timestamp_minutes(&self) -> Vec<Timestamp> {
        vec![self.active_timestamp().to_string()]
    }

    pub fn panels(&self) -> Vec<Panel> {
        let mut panels = Vec::with_capacity(Panel::SINGLE.len() + 1);
        if self.selection.is_comparative() {
            panels.push(Panel::ComparativeAnalysis);
        }
        panels.extend(Panel::SINGLE);
        panels
    }

    pub fn active_panel(&self) -> Panel {
        self.panel
    }

    /// Returns false when `panel` is not offered for this selection.
    pub fn select_panel(&mut self, panel: Panel) -> bool {
        if !self.panels().contains(&panel) {
            return false;
        }
        self.panel = panel;
        true
    }

    pub fn shows_timestamp_picker(&self) -> bool {
        self.selection.is_comparative() && self.panel != Panel::ComparativeAnalysis
    }
}
