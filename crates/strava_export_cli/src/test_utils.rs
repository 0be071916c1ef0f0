//! Scripted prompter and in-memory `StravaClient` shared by the unit tests.
#![cfg(test)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use strava_export_client::{Activity, ActivityQuery, AthleteProfile, StravaClient, StravaError};

use crate::prompt::Prompter;

/// One canned answer, consumed in order.
#[derive(Debug)]
pub enum Answer {
    Select(usize),
    Input(&'static str),
    Confirm(bool),
}

/// Replays a fixed script; running past its end behaves like a closed
/// terminal.
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }

    fn next(&mut self, prompt: &str) -> io::Result<Answer> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, items: &[&str], _default: usize) -> io::Result<usize> {
        match self.next(prompt)? {
            Answer::Select(i) if i < items.len() => Ok(i),
            other => panic!("'{prompt}' offers {items:?}, script had {other:?}"),
        }
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String> {
        match self.next(prompt)? {
            Answer::Input("") => Ok(default.unwrap_or_default().to_string()),
            Answer::Input(text) => Ok(text.to_string()),
            other => panic!("'{prompt}' wants text, script had {other:?}"),
        }
    }

    fn confirm(&mut self, prompt: &str, _default: bool) -> io::Result<bool> {
        match self.next(prompt)? {
            Answer::Confirm(yes) => Ok(yes),
            other => panic!("'{prompt}' wants yes/no, script had {other:?}"),
        }
    }
}

/// Serves `activities` page by page and records every query.
pub struct MockClient {
    activities: Vec<Activity>,
    error: Option<fn() -> StravaError>,
    pub queries: Mutex<Vec<ActivityQuery>>,
}

impl MockClient {
    pub fn with_activities(count: u64) -> Self {
        let activities = (1..=count)
            .map(|id| Activity {
                id,
                name: Some(format!("Morning Run {id}")),
                activity_type: Some("Run".into()),
                start_date: Some("2025-11-24T06:30:00Z".into()),
                distance: Some(5000.0),
                moving_time: Some(1500),
                elapsed_time: Some(1600),
                average_speed: Some(3.0),
                ..Default::default()
            })
            .collect();
        Self {
            activities,
            error: None,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> StravaError) -> Self {
        Self {
            activities: Vec::new(),
            error: Some(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl StravaClient for MockClient {
    async fn get_athlete(&self) -> Result<AthleteProfile, StravaError> {
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(AthleteProfile {
            id: 42,
            firstname: Some("Test".into()),
            lastname: Some("Athlete".into()),
        })
    }

    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, StravaError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(error) = self.error {
            return Err(error());
        }
        let per_page = query.per_page as usize;
        let skip = (query.page.saturating_sub(1) as usize) * per_page;
        Ok(self
            .activities
            .iter()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect())
    }
}
