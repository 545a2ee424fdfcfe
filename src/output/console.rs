use colored::Colorize;
use std::io::{self, stdout, Write};

use crate::engine::types::{ProgressSink, RunObserver, TestType};

const BAR_LEN: usize = 30;

/// Render one progress line, e.g. `Downloading [=====-----] 50% | 12.34 Mbps`.
pub fn render_bar(label: &str, percent: f64, mbps: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_LEN as f64) as usize;
    format!(
        "{label} [{}{}] {percent:>3.0}% | {mbps:.2} Mbps",
        "=".repeat(filled),
        "-".repeat(BAR_LEN - filled),
    )
}

/// Live terminal output for the default mode.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    phase: Option<TestType>,
    bar_drawn: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar_label(&self) -> Option<&'static str> {
        match self.phase {
            Some(TestType::Download) => Some("Downloading"),
            Some(TestType::Upload) => Some("Uploading"),
            _ => None,
        }
    }

    /// Redraw the progress line in place. Returns false outside a transfer phase.
    fn draw<W: Write>(&mut self, out: &mut W, percent: f64, mbps: f64) -> io::Result<bool> {
        let Some(label) = self.bar_label() else {
            return Ok(false);
        };
        write!(out, "\r{}", render_bar(label, percent, mbps))?;
        out.flush()?;
        self.bar_drawn = true;
        Ok(true)
    }
}

impl ProgressSink for ConsoleObserver {
    fn on_progress(&mut self, percent: f64, mbps: f64) {
        self.draw(&mut stdout(), percent, mbps)
            .expect("error printing progress bar");
    }
}

impl RunObserver for ConsoleObserver {
    fn started(&mut self) {
        println!("{}", "\n🌐 Internet Speed Test CLI\n".cyan().bold());
    }

    fn phase_started(&mut self, test_type: TestType) {
        self.phase = Some(test_type);
        self.bar_drawn = false;
        let header = match test_type {
            TestType::Latency => "\n📡 Testing Ping...",
            TestType::Download => "\n📥 Testing Download Speed...",
            TestType::Upload => "\n📤 Testing Upload Speed...",
        };
        println!("{}", header.blue());
    }

    fn phase_finished(&mut self, test_type: TestType, value: f64) {
        if self.bar_drawn {
            println!();
        }
        let line = match test_type {
            TestType::Latency => format!("🏓 Average Ping: {value:.2} ms"),
            TestType::Download => format!("✅ Download Speed: {value:.2} Mbps"),
            TestType::Upload => format!("✅ Upload Speed: {value:.2} Mbps"),
        };
        println!("{}", line.green());
        self.phase = None;
        self.bar_drawn = false;
    }
}
