//! Full-screen bar charts for `summary --chart` and `schedule day --chart`.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pomoplan_core::{ScheduleEntry, WeeklySummary};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{BarChart, Block, Borders, Paragraph},
};
use std::collections::BTreeMap;
use std::io::{self, Stdout};

/// One screen: a titled bar chart plus a few lines of notes under it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPage {
    pub title: String,
    pub bars: Vec<(String, u64)>,
    pub notes: Vec<String>,
}

pub fn summary_pages(s: &WeeklySummary) -> Vec<ChartPage> {
    let per_day = s
        .per_day
        .iter()
        .map(|(d, n)| (d.format("%a %d").to_string(), *n))
        .collect();
    let per_category = s
        .by_category
        .iter()
        .map(|(c, n)| (c.as_str().to_string(), *n))
        .collect();
    let notes = vec![format!(
        "{} .. {}: {} blocks, {} focus minutes",
        s.start, s.end, s.total, s.focus_minutes
    )];

    vec![
        ChartPage {
            title: "Blocks per day".into(),
            bars: per_day,
            notes: notes.clone(),
        },
        ChartPage {
            title: "Blocks per category".into(),
            bars: per_category,
            notes,
        },
    ]
}

/// Planned half-hour slots per task, in first-scheduled order.
pub fn schedule_pages(entries: &[ScheduleEntry]) -> Vec<ChartPage> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for e in entries {
        let n = counts.entry(e.task.clone()).or_insert(0);
        if *n == 0 {
            order.push(e.task.clone());
        }
        *n += 1;
    }
    let bars = order
        .into_iter()
        .map(|t| {
            let n = counts.get(&t).copied().unwrap_or(0);
            (t, n)
        })
        .collect();

    vec![ChartPage {
        title: "Planned slots per task".into(),
        bars,
        notes: vec![format!("{} slots of 30 minutes", entries.len())],
    }]
}

pub fn show(pages: &[ChartPage]) -> Result<()> {
    if pages.is_empty() {
        return Ok(());
    }
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = chart_loop(&mut terminal, pages);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn chart_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, pages: &[ChartPage]) -> Result<()> {
    let mut current = 0usize;

    loop {
        let page = &pages[current];
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(4)])
                .split(f.area());

            let data: Vec<(&str, u64)> = page.bars.iter().map(|(l, n)| (l.as_str(), *n)).collect();
            let title = format!("{} ({}/{})", page.title, current + 1, pages.len());
            let chart = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title(title))
                .data(data.as_slice())
                .bar_width(9)
                .bar_gap(2)
                .bar_style(Style::default().fg(Color::Yellow))
                .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
            f.render_widget(chart, chunks[0]);

            let mut lines: Vec<Line> = page.notes.iter().map(|n| Line::raw(n.as_str())).collect();
            lines.push(Line::styled(
                "Left/Right: switch page, q/Esc: quit",
                Style::default().fg(Color::Gray),
            ));
            f.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::ALL)),
                chunks[1],
            );
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Right | KeyCode::Char('l') => current = (current + 1) % pages.len(),
                    KeyCode::Left | KeyCode::Char('h') => {
                        current = (current + pages.len() - 1) % pages.len()
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}
