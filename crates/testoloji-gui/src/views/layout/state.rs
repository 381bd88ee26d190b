use std::path::PathBuf;
use std::time::Duration;
use testoloji_layout::{LayoutOptions, LayoutStatistics, PaginationCache, Question};
use testoloji_runtime::{CountdownEvent, ExamCountdown};
use tokio::sync::mpsc;

pub struct LayoutViewState {
    pub options: LayoutOptions,
    pub manifest_path: Option<PathBuf>,
    pub questions: Vec<Question>,
    pub cache: PaginationCache,
    pub stats: Option<LayoutStatistics>,
    pub needs_stats: bool,
    pub timer: ExamTimer,
}

impl Default for LayoutViewState {
    fn default() -> Self {
        Self {
            options: LayoutOptions::default(),
            manifest_path: None,
            questions: Vec::new(),
            cache: PaginationCache::new(),
            stats: None,
            needs_stats: false,
            timer: ExamTimer::default(),
        }
    }
}

impl LayoutViewState {
    pub fn manifest_loaded(&mut self, path: PathBuf, title: Option<String>, questions: Vec<Question>) {
        self.manifest_path = Some(path);
        if let Some(title) = title {
            self.options.title = title;
        }
        self.questions = questions;
        self.stats = None;
        self.needs_stats = true;
    }

    pub fn options_changed(&mut self) {
        self.stats = None;
        self.needs_stats = true;
    }
}

/// Practice timer for a printed exam
pub struct ExamTimer {
    pub minutes: u32,
    pub remaining: Option<Duration>,
    pub expired: bool,
    countdown: Option<(ExamCountdown, mpsc::UnboundedReceiver<CountdownEvent>)>,
}

impl Default for ExamTimer {
    fn default() -> Self {
        Self {
            minutes: 40,
            remaining: None,
            expired: false,
            countdown: None,
        }
    }
}

impl ExamTimer {
    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn start(&mut self, runtime: &tokio::runtime::Handle) {
        let duration = Duration::from_secs(u64::from(self.minutes) * 60);
        let (tx, rx) = mpsc::unbounded_channel();
        let _guard = runtime.enter();
        self.countdown = Some((ExamCountdown::start(duration, tx), rx));
        self.remaining = Some(duration);
        self.expired = false;
        log::info!("Exam timer started for {} minutes", self.minutes);
    }

    pub fn stop(&mut self) {
        if let Some((countdown, _)) = self.countdown.take() {
            countdown.stop();
        }
        self.remaining = None;
    }

    /// Apply countdown events; true once when time runs out
    pub fn poll(&mut self) -> bool {
        let Some((_, rx)) = &mut self.countdown else {
            return false;
        };

        let mut expired = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                CountdownEvent::Tick { remaining } => self.remaining = Some(remaining),
                CountdownEvent::Expired => expired = true,
            }
        }

        if expired {
            self.countdown = None;
            self.remaining = Some(Duration::ZERO);
            self.expired = true;
        }
        expired
    }
}
