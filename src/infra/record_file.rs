use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use time::{OffsetDateTime, format_description};
use tracing::{debug, warn};

use crate::game::GameSummary;
use crate::infra::{GameObserver, StageRecorder};
use crate::planners::StagePlan;
use crate::state::{Stage, TurnResult};

/// Writes the dump of every finished stage into a records folder.
pub struct RecordFile {
    folder: PathBuf,
    recorder: StageRecorder,
}

impl RecordFile {
    pub fn new(records_folder: &str) -> Result<Self, io::Error> {
        let folder = Path::new(records_folder).to_path_buf();
        if !folder.exists() {
            fs::create_dir_all(&folder)?;
        }
        Ok(RecordFile {
            folder,
            recorder: StageRecorder::new(),
        })
    }

    pub fn file_name(number: u32) -> String {
        format!("{} - stage {:03}.txt", timestamp(), number)
    }

    fn write(&self, number: u32) -> io::Result<PathBuf> {
        let filename = self.folder.join(Self::file_name(number));
        fs::write(&filename, self.recorder.render())?;
        Ok(filename)
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_description::parse("[year][month][day]-[hour][minute][second]")
        .ok()
        .and_then(|format| now.format(&format).ok())
        .unwrap_or_else(|| now.unix_timestamp().to_string())
}

impl GameObserver for RecordFile {
    fn on_stage_start(&mut self, number: u32, stage: &Stage) {
        self.recorder.on_stage_start(number, stage);
    }

    fn on_plan_ready(&mut self, number: u32, plan: &StagePlan) {
        self.recorder.on_plan_ready(number, plan);
    }

    fn on_turn(&mut self, result: &TurnResult, stage: &Stage) {
        self.recorder.on_turn(result, stage);
    }

    fn on_stage_finished(&mut self, number: u32, stage: &Stage) {
        self.recorder.on_stage_finished(number, stage);
        match self.write(number) {
            Ok(filename) => debug!("Stage {} recorded to {}", number, filename.display()),
            Err(error) => warn!("Failed to record stage {}: {}", number, error),
        }
    }

    fn on_game_finished(&mut self, _summary: &GameSummary) {}
}
