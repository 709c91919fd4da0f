use shared_types::Timestamp;

use crate::client::{AnalyticsClient, Transport};
use crate::error::{ApiError, SelectionError};
use crate::fetch::{Applied, FetchState, Query, Ticket};
use crate::selection::{MinutePicker, Selection};

/// Hours of the day offered as buttons, whether or not the file has them.
pub const HOURS_IN_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinutesKey {
    pub file_name: String,
    pub hour: u32,
}

/// Hour and minute picking for an uploaded file.
#[derive(Debug, Clone)]
pub struct DashboardState {
    file_name: String,
    hours: Query<String, Vec<u32>>,
    minutes: Query<MinutesKey, Vec<Timestamp>>,
    selected_hour: Option<u32>,
    picker: MinutePicker,
}

impl DashboardState {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            hours: Query::new("Failed to load hours"),
            minutes: Query::new("Failed to load minutes"),
            selected_hour: None,
            picker: MinutePicker::new(),
        }
    }

    /// Rebuild the dashboard a user navigates back to from `selection`:
    /// same hour, same picked minutes.
    pub fn restore(selection: &Selection) -> Self {
        let mut state = Self::new(selection.file_name());
        state.selected_hour = Some(selection.hour());
        state.picker.replace(selection.minutes());
        state
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn hours(&self) -> &FetchState<Vec<u32>> {
        self.hours.state()
    }

    pub fn minutes(&self) -> &FetchState<Vec<Timestamp>> {
        self.minutes.state()
    }

    pub fn selected_hour(&self) -> Option<u32> {
        self.selected_hour
    }

    pub fn picker(&self) -> &MinutePicker {
        &self.picker
    }

    pub fn hour_available(&self, hour: u32) -> bool {
        self.hours
            .data()
            .map(|hours| hours.contains(&hour))
            .unwrap_or(false)
    }

    /// Fetch the file's hours once per file name.
    pub fn load_hours(&mut self) -> Option<Ticket<String>> {
        if self.file_name.is_empty() {
            return None;
        }
        self.hours.begin_if_changed(self.file_name.clone())
    }

    pub fn apply_hours(&mut self, ticket: &Ticket<String>, result: Result<Vec<u32>, ApiError>) -> Applied {
        self.hours.apply(ticket, result)
    }

    /// Clicking an hour always refetches its minutes.
    pub fn select_hour(&mut self, hour: u32) -> Ticket<MinutesKey> {
        if self.selected_hour != Some(hour) {
            self.picker.clear();
        }
        self.selected_hour = Some(hour);
        self.minutes.begin(MinutesKey {
            file_name: self.file_name.clone(),
            hour,
        })
    }

    /// Minutes of the restored hour, if they have not been loaded yet.
    pub fn resume_minutes(&mut self) -> Option<Ticket<MinutesKey>> {
        let hour = self.selected_hour?;
        self.minutes.begin_if_changed(MinutesKey {
            file_name: self.file_name.clone(),
            hour,
        })
    }

    pub fn apply_minutes(
        &mut self,
        ticket: &Ticket<MinutesKey>,
        result: Result<Vec<Timestamp>, ApiError>,
    ) -> Applied {
        self.minutes.apply(ticket, result)
    }

    pub fn toggle_minute(&mut self, minute: &str) -> bool {
        self.picker.toggle(minute)
    }

    pub fn can_visualize(&self) -> bool {
        self.selected_hour.is_some() && !self.picker.is_empty()
    }

    pub fn visualize(&self) -> Result<Selection, SelectionError> {
        let hour = self.selected_hour.ok_or(SelectionError::NoHour)?;
        Selection::new(self.file_name.clone(), hour, self.picker.picked().to_vec())
    }

    pub async fn fetch_hours<T: Transport>(
        client: &AnalyticsClient<T>,
        ticket: &Ticket<String>,
    ) -> Result<Vec<u32>, ApiError> {
        client.hours(ticket.key()).await
    }

    pub async fn fetch_minutes<T: Transport>(
        client: &AnalyticsClient<T>,
        ticket: &Ticket<MinutesKey>,
    ) -> Result<Vec<Timestamp>, ApiError> {
        let key = ticket.key();
        client.minutes(&key.file_name, key.hour).await
    }
}
