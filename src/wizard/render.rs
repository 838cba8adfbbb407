//! Shared rendering utilities for wizard prompts

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Color, IndexPrefix, RenderConfig, StyleSheet, Styled};
use std::time::Duration;

/// Number of steps in the wizard, shown in every step header
pub const TOTAL_STEPS: u8 = 6;

/// Get the standard render config for wizard prompts
pub fn wizard_render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_highlighted_option_prefix(Styled::new("▸ ").with_fg(Color::LightCyan))
        .with_option_index_prefix(IndexPrefix::Simple)
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightCyan)))
        .with_scroll_up_prefix(Styled::new("▲ "))
        .with_scroll_down_prefix(Styled::new("▼ "))
}

/// Print the wizard banner
pub fn display_banner() {
    let rule = "═══════════════════════════════════════════════════════════════";
    println!();
    println!("{}", rule.bright_cyan());
    println!(
        "{}",
        "                  OpenClaw Easy Deploy                         "
            .bright_cyan()
            .bold()
    );
    println!("{}", rule.bright_cyan());
    println!(
        "  {}",
        "Render · DigitalOcean · custom VPS · local Docker".dimmed()
    );
}

/// Display a wizard step header box
pub fn display_step_header(step_number: u8, step_name: &str, description: &str) {
    let term_width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    let box_width = term_width.clamp(20, 70);
    let inner_width = box_width - 4;

    println!();
    let header = format!("─ Step {}/{} · {} ", step_number, TOTAL_STEPS, step_name);
    println!(
        "{}{}{}",
        "┌".bright_cyan(),
        header.bright_cyan(),
        "─"
            .repeat(inner_width.saturating_sub(header.chars().count()))
            .bright_cyan()
    );

    for line in textwrap::wrap(description, inner_width - 2) {
        println!("{}  {}", "│".dimmed(), line.white());
    }

    println!("{}{}", "└".dimmed(), "─".repeat(box_width - 1).dimmed());
    println!();
}

/// Format a status indicator (checkmark or X)
pub fn status_indicator(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Print a single check line: indicator, label, detail
pub fn print_check(ok: bool, label: &str, detail: &str) {
    println!("  {} {} {}", status_indicator(ok), label.bold(), detail.dimmed());
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Start a steady-ticking spinner with `message`
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
