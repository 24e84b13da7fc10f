use anyhow::Context;
use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

use crate::settings::LogSettings;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions handed out to quiz players",
        &["category"]
    )
    .unwrap();
}

pub fn log_filter(settings: &LogSettings) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&settings.level)
        .with_context(|| format!("Invalid log level {:?}", settings.level))
}

pub fn init_tracing(settings: &LogSettings) -> anyhow::Result<()> {
    let span_events = if settings.span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(log_filter(settings)?)
        .with(fmt::layer().with_span_events(span_events))
        .try_init()
        .context("Tracing subscriber already installed")
}
