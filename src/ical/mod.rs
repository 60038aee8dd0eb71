//! This module handles the export of events as iCal files
//!
//! Calendar apps import these files, and rely on their exact structure (see [`build_from`])

use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::config::CalendarIdentity;
use crate::event::EventRecord;

mod builder;
pub use builder::build_from;

/// MIME type of the downloadable file
pub const ICS_MIME_TYPE: &str = "text/calendar;charset=utf-8";

/// An "Add to calendar" download
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcsFile {
    filename: String,
    content: String,
}

impl IcsFile {
    pub fn for_event(event: &EventRecord, identity: &CalendarIdentity, zone: Tz) -> Self {
        let stem = event.title().unwrap_or("event");
        Self {
            filename: sanitize_filename::sanitize(format!("{}.ics", stem)),
            content: build_from(event, identity, zone),
        }
    }

    /// `{title}.ics`, or `event.ics` for untitled events. Characters that are not valid in file names are removed.
    pub fn filename(&self) -> &str  { &self.filename }
    pub fn mime_type(&self) -> &str { ICS_MIME_TYPE }
    pub fn content(&self) -> &str   { &self.content }

    /// Write the file into `folder`, and return its path
    pub fn save_to_folder(&self, folder: &Path) -> std::io::Result<PathBuf> {
        let path = folder.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        log::debug!("Saved {:?}", path);
        Ok(path)
    }
}
