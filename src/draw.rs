use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};

use crate::app::{App, MenuItem};
use crate::state::app_state::PredictionField;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::{Local, Utc};
use frenzy_api::{Game, Row, TOTAL_WEEKS};

static TABS: &[&str; 4] = &["Dashboard", "Picks", "Weekly Board", "Overall"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Dashboard => draw_dashboard(f, layout.main, app),
            MenuItem::Picks => draw_picks(f, layout.main, app),
            MenuItem::Weekly => draw_weekly(f, layout.main, app),
            MenuItem::Overall => draw_overall(f, layout.main, app),
            MenuItem::Help => draw_placeholder(
                f,
                layout.main,
                "Help: q=quit  1=Dashboard  2=Picks  3=Weekly  4=Overall  j/k=move  h/l=pick away/home  g/p=edit GOTW/POTW  s=submit  [/]=week  b=board for week  \"=logs",
            ),
        }

        if let Some(log_area) = layout.logs {
            draw_logs(f, log_area);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Dashboard => 0,
        MenuItem::Picks => 1,
        MenuItem::Weekly => 2,
        MenuItem::Overall => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Season ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let now = Utc::now();
    let mut lines: Vec<Line> = Vec::with_capacity(TOTAL_WEEKS as usize + 3);

    lines.push(Line::from(Span::styled(
        "Keys: j/k=move  Enter=pick form  b=weekly board  ?=help  q=quit",
        Style::default().fg(Color::DarkGray),
    )));
    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("Last error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));

    // The full week list always renders, even when every fetch failed;
    // statuses just stay at their provisional guesses.
    for week in 1..=TOTAL_WEEKS {
        let selected = week == app.state.dashboard.selected_week();
        let marker = if selected { '>' } else { ' ' };
        let locked =
            app.state
                .dashboard
                .submission_locked(week, app.state.current_week, now);
        let status = if locked { "Locked" } else { "Open" };
        let submitted = match app.state.week_pick(week) {
            Some(pick) if locked => format!("  Submitted: {}", pick.team),
            Some(pick) => format!("  Submitted: {} — Edit", pick.team),
            None => String::new(),
        };
        let current_tag = if week == app.state.current_week { "  (current)" } else { "" };

        let style = if selected {
            Style::default().fg(Color::Yellow)
        } else if locked {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} Week {week:>2}  [{status:>6}]{submitted}{current_tag}"),
            style,
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_picks(f: &mut Frame, area: Rect, app: &App) {
    let picks = &app.state.picks;
    let block = default_border(Color::White).title(format!(" Week {} Pick ", picks.week));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    let banner = picks.countdown.banner().unwrap_or_else(|| {
        "No Sunday kickoff on the schedule yet — picks stay open.".to_owned()
    });
    let banner_style = if picks.countdown.is_locked() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    lines.push(Line::from(Span::styled(banner, banner_style)));
    lines.push(Line::from(Span::styled(
        "Keys: j/k=game  h=away  l=home  g=GOTW  p=POTW  s=submit  [/]=week",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if !picks.games_loaded {
        lines.push(Line::from("Loading this week's games..."));
    } else if picks.games.is_empty() {
        lines.push(Line::from("No games scheduled for this week."));
    }

    let used = frenzy_api::rules::used_teams(&app.state.season_picks, picks.week);
    let now = Utc::now();

    for (idx, game) in picks.games.iter().enumerate() {
        let marker = if idx == picks.cursor { '>' } else { ' ' };
        let away = team_cell(game, &game.away_team, picks.chosen_team.as_deref(), &used);
        let home = team_cell(game, &game.home_team, picks.chosen_team.as_deref(), &used);
        let when = game
            .kickoff
            .map(|k| k.with_timezone(&Local).format("%a %-I:%M %p").to_string())
            .unwrap_or_else(|| "TBD".to_owned());
        let locked_tag = if game.kicked_off(now) { "  LOCKED" } else { "" };

        let style = if game.kicked_off(now) {
            Style::default().fg(Color::DarkGray)
        } else if idx == picks.cursor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {away} @ {home}  [{when}]{locked_tag}"),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(prediction_line(
        "GOTW combined score [g]",
        &picks.gotw_input,
        picks.editing == Some(PredictionField::Gotw),
    ));
    lines.push(prediction_line(
        "POTW passing yards  [p]",
        &picks.potw_input,
        picks.editing == Some(PredictionField::Potw),
    ));

    if let Some(feedback) = picks.feedback.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            feedback.to_owned(),
            Style::default().fg(Color::Yellow),
        )));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn team_cell(game: &Game, team: &str, chosen: Option<&str>, used: &[String]) -> String {
    let mark = if chosen == Some(team) { '●' } else { '○' };
    let fav = if game.favorite.as_deref() == Some(team) { "*" } else { "" };
    let used_tag = if used.iter().any(|u| u == team) { " (used)" } else { "" };
    format!("{mark} {team}{fav}{used_tag}")
}

fn prediction_line(label: &str, input: &str, editing: bool) -> Line<'static> {
    let (shown, style) = if editing {
        (format!("{input}_"), Style::default().fg(Color::Yellow))
    } else if input.is_empty() {
        ("—".to_owned(), Style::default().fg(Color::DarkGray))
    } else {
        (input.to_owned(), Style::default().fg(Color::White))
    };
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::styled(shown, style),
    ])
}

fn draw_weekly(f: &mut Frame, area: Rect, app: &App) {
    let board_state = &app.state.board;
    let block =
        default_border(Color::White).title(format!(" Weekly Board — Week {} ", board_state.week));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(board) = board_state.board.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Board load failed:\n{err}")
        } else {
            "Loading weekly board...".to_owned()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        "Keys: j/k=scroll  [/]=week  r=refresh",
        Style::default().fg(Color::DarkGray),
    )));
    if board.factor > 1 {
        lines.push(Line::from(Span::styled(
            format!("DOUBLE POINTS WEEK (x{})", board.factor),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        )));
    }

    if board_state.reveal.locked {
        lines.push(Line::from(Span::styled(
            format!("Picks are hidden until {}", board_state.reveal.display_text()),
            Style::default().fg(Color::Yellow),
        )));
        lines.push(Line::from(""));
        for (idx, row) in board.rows.iter().enumerate() {
            lines.push(Line::from(format!("  {}", row.label(idx))));
        }
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "  {:<18} {:<20} {:>6} {:>6} {:>5} {:>5} {:>5}",
                "Player", "Pick", "GOTW", "POTW", "Base", "Bonus", "Total"
            ),
            Style::default().fg(Color::Gray),
        )));
        for (idx, row) in board.rows.iter().enumerate() {
            lines.push(board_row_line(row, idx));
        }
        lines.push(Line::from(""));
        if let Some(actual) = board.gotw_actual_total {
            lines.push(Line::from(Span::styled(
                format!("GOTW actual combined score: {actual}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        if let Some(actual) = board.potw_actual_yards {
            lines.push(Line::from(Span::styled(
                format!("POTW actual passing yards: {actual}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if board.qa_mode {
        lines.push(Line::from(Span::styled(
            "QA preview — reveal locks bypassed",
            Style::default().fg(Color::Red),
        )));
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(board_state.scroll as usize)
        .take(inner.height as usize)
        .collect();
    f.render_widget(Paragraph::new(visible), inner);
}

fn board_row_line(row: &Row, idx: usize) -> Line<'static> {
    let winner = if row.is_weekly_winner { "★" } else { " " };
    let name = truncate(&row.label(idx), 17);

    let pick = match row.team.as_deref() {
        Some(team) => {
            let side = match row.is_favorite {
                Some(true) => " (fav)",
                Some(false) => " (dog)",
                None => "",
            };
            let verdict = match row.is_correct_pick {
                Some(true) => " ✓",
                Some(false) => " ✗",
                None => "",
            };
            truncate(&format!("{team}{side}{verdict}"), 20)
        }
        None => "—".to_owned(),
    };

    let gotw = match row.gotw_prediction {
        Some(g) => match row.gotw_rank {
            Some(rank) => format!("{g} #{rank}"),
            None => g.to_string(),
        },
        None => "—".to_owned(),
    };
    let potw = match row.potw_prediction {
        Some(p) if row.potw_exact => format!("{p} ="),
        Some(p) => p.to_string(),
        None => "—".to_owned(),
    };

    let points = |v: Option<i64>| v.map(|p| p.to_string()).unwrap_or_else(|| "—".to_owned());

    let style = if row.is_weekly_winner {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(
        format!(
            "{winner} {:<18} {:<20} {:>6} {:>6} {:>5} {:>5} {:>5}",
            name,
            pick,
            gotw,
            potw,
            points(row.base_points),
            points(row.bonus_points),
            points(row.total_points),
        ),
        style,
    ))
}

fn draw_overall(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Overall Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let overall = &app.state.overall;
    if !overall.loaded {
        f.render_widget(
            Paragraph::new("Loading season standings...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }
    if overall.standings.is_empty() {
        f.render_widget(
            Paragraph::new("No scored weeks yet.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(overall.standings.len() + 2);
    lines.push(Line::from(Span::styled(
        format!(
            "{:>4} {:<18} {:>6} {:>4} {:>4} {:>4} {:>5} {:>5}",
            "#", "Player", "Pts", "Wks", "Fav", "Dog", "GOTW", "POTW"
        ),
        Style::default().fg(Color::Gray),
    )));
    for (idx, row) in overall.standings.iter().enumerate() {
        let name = row
            .display_name
            .clone()
            .or_else(|| row.user_id.map(|id| format!("User {id}")))
            .unwrap_or_else(|| format!("Player {}", idx + 1));
        lines.push(Line::from(format!(
            "{:>4} {:<18} {:>6} {:>4} {:>4} {:>4} {:>5} {:>5}",
            idx + 1,
            truncate(&name, 17),
            row.total_points,
            row.weeks_scored,
            row.correct_favorites,
            row.correct_underdogs,
            row.gotw_firsts,
            row.potw_exact,
        )));
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(overall.scroll as usize)
        .take(inner.height as usize)
        .collect();
    f.render_widget(Paragraph::new(visible), inner);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = tui_logger::TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
