// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Configure how [`miette::Report`]s are printed when `main()` returns an error.

use miette::MietteHandlerOpts;
use tracing::debug;

/// The [`miette::ErrorHook`] is lazily evaluated.
///
/// The terminal width is measured only when a report is actually printed, so if no
/// error ever reaches `main()` the terminal is never queried. `footer`, when given, is
/// printed under every report.
pub fn setup_default_miette_global_report_handler(footer: Option<&'static str>) {
    miette::set_hook(Box::new(move |_report| {
        let terminal_width = {
            let it = crossterm::terminal::size()
                .map(|(columns, _rows)| columns)
                .unwrap_or(80) as usize;
            debug!(message = "miette::set_hook", terminal_width = it);
            it
        };
        let opts = MietteHandlerOpts::new()
            .width(terminal_width)
            .wrap_lines(true)
            .unicode(true)
            .context_lines(3)
            .with_cause_chain();
        let opts = match footer {
            Some(footer) => opts.footer(footer.to_string()),
            None => opts,
        };
        Box::new(opts.build())
    }))
    .ok();
}
