//! Frame rendering
//!
//! Pure drawing: everything here reads `App` and paints widgets, the only
//! mutation is the sales table scroll state that ratatui needs by `&mut`.

use ratatui::{prelude::*, widgets::*};
use rust_decimal::prelude::ToPrimitive;
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, InputMode, Screen, TABLE_GRID_COLUMNS};
use crate::form::{SaleField, SaleForm, TableField, TableForm};

/// Draw one frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let screen = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(screen);

    draw_header(f, app, chunks[0]);
    match app.screen {
        Screen::Sales => draw_sales(f, app, chunks[1]),
        Screen::Tables => draw_tables(f, app, chunks[1]),
        Screen::Logs => draw_logs(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);

    match &app.input_mode {
        InputMode::Normal => {}
        InputMode::SaleForm(form) => draw_sale_form(f, form, screen),
        InputMode::TableForm(form) => draw_table_form(f, form, screen),
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(18)])
        .split(area);

    let titles: Vec<Line> = Screen::ALL.iter().map(|s| Line::from(s.title())).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" 🦪 Blue Oyster "),
        )
        .select(app.screen.index())
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let fetch_chip = if app.registry.is_loading() {
        Span::styled("fetching...", Style::default().fg(Color::Yellow))
    } else if app.registry.error().is_some() {
        Span::styled("fetch error", Style::default().fg(Color::Red))
    } else {
        Span::styled(
            format!("{} tables", app.registry.tables().len()),
            Style::default().fg(Color::DarkGray),
        )
    };
    let chip = Paragraph::new(Line::from(fetch_chip)).block(Block::default().borders(Borders::ALL));
    f.render_widget(chip, chunks[1]);
}

fn draw_sales(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(12)])
        .split(area);

    let header = Row::new(vec![
        "Name",
        "Email",
        "Date",
        "Category",
        "Description",
        "Amount",
        "Payment",
        "Receipt",
    ])
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .ledger
        .entries()
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(e.name.clone()),
                Cell::from(e.email.clone()),
                Cell::from(e.date.clone()),
                Cell::from(e.category.label()),
                Cell::from(e.description.clone()),
                Cell::from(Text::from(e.amount.clone()).alignment(Alignment::Right)),
                Cell::from(e.payment_method.label()),
                Cell::from(e.receipt_link.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(24),
        Constraint::Length(10),
        Constraint::Length(11),
        Constraint::Min(12),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Recent Sales "))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(table, chunks[0], &mut app.sales_state);

    draw_category_chart(f, app, chunks[1]);
}

fn draw_category_chart(f: &mut Frame, app: &App, area: Rect) {
    let totals = app.ledger.category_totals();
    let bars: Vec<Bar> = totals
        .iter()
        .map(|(category, total)| {
            Bar::default()
                .label(Line::from(category.label()))
                .value(total.round().to_u64().unwrap_or(0))
                .text_value(total.to_string())
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Expense Chart (by Category) "),
        )
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn draw_tables(f: &mut Frame, app: &App, area: Rect) {
    let title = if app.registry.is_loading() {
        " All Tables (fetching...) "
    } else {
        " All Tables "
    };
    let outer = Block::default().borders(Borders::ALL).title(title);
    let mut inner = outer.inner(area);
    f.render_widget(outer, area);

    if let Some(error) = app.registry.error() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        let banner = Paragraph::new(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default().fg(Color::Red),
        )));
        f.render_widget(banner, chunks[0]);
        inner = chunks[1];
    }

    if app.registry.tables().is_empty() {
        let hint = if app.registry.is_loading() {
            "Fetching tables from the admin API..."
        } else {
            "No tables. Press r to fetch, a to add one locally."
        };
        f.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    draw_table_grid(f, app, inner);
}

fn draw_table_grid(f: &mut Frame, app: &App, area: Rect) {
    const CARD_HEIGHT: u16 = 4;
    let tables = app.registry.tables();
    let columns = TABLE_GRID_COLUMNS;
    let total_rows = tables.len().div_ceil(columns);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;

    // Scroll the grid so the selected card stays in view
    let selected_row = app.tables_selected.min(tables.len() - 1) / columns;
    let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));

    for (slot, row_index) in (first_row..total_rows).take(visible_rows).enumerate() {
        let y = area.y + slot as u16 * CARD_HEIGHT;
        if y >= area.y + area.height {
            break;
        }
        let height = CARD_HEIGHT.min(area.y + area.height - y);
        let row_area = Rect::new(area.x, y, area.width, height);
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        for column in 0..columns {
            let index = row_index * columns + column;
            if let Some(table) = tables.get(index) {
                draw_table_card(f, table, index == app.tables_selected, cells[column]);
            }
        }
    }
}

fn draw_table_card(f: &mut Frame, table: &shared::Table, selected: bool, area: Rect) {
    let border_style = if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", table.name));

    let (dot_style, status) = if table.is_occupied {
        (Style::default().fg(Color::Green), "Occupied")
    } else {
        (Style::default().fg(Color::Yellow), "Free")
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("● ", dot_style),
        Span::raw(status),
    ])];
    if table.is_occupied {
        lines.push(Line::from(Span::styled(
            format!("View Orders  /table/{}", table.id),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(Block::default().borders(Borders::ALL).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Green))
        .style_debug(Style::default().fg(Color::Gray))
        .style_trace(Style::default().fg(Color::DarkGray))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(true)
        .output_file(false)
        .output_line(false)
        .state(&app.logger_state);
    f.render_widget(widget, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = if !matches!(app.input_mode, InputMode::Normal) {
        Line::from(Span::styled(
            "Tab next field  Left/Right cycle choice  Enter save  Esc cancel",
            Style::default().fg(Color::DarkGray),
        ))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Cyan),
        ))
    } else {
        let hints = match app.screen {
            Screen::Sales => "Up/Down select  c create  e edit  x delete  Tab screens  q quit",
            Screen::Tables => {
                "Arrows select  r refresh  a add  o toggle  x remove  Enter orders  q quit"
            }
            Screen::Logs => "Up/Down scroll  PgUp/PgDn page  Tab screens  q quit",
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_sale_form(f: &mut Frame, form: &SaleForm, screen: Rect) {
    let area = centered_rect(56, 13, screen);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(form.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    const LABEL_WIDTH: u16 = 16;
    let rows = [
        (SaleField::Name, form.name.value().to_string()),
        (SaleField::Email, form.email.value().to_string()),
        (SaleField::Date, form.date.value().to_string()),
        (
            SaleField::Category,
            format!("< {} >", form.category().label()),
        ),
        (SaleField::Description, form.description.value().to_string()),
        (SaleField::Amount, form.amount.value().to_string()),
        (
            SaleField::Payment,
            format!("< {} >", form.payment_method().label()),
        ),
        (SaleField::Receipt, form.receipt_link.value().to_string()),
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (field, value) in &rows {
        let label_style = if *field == form.focus {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", field.label(), width = LABEL_WIDTH as usize),
                label_style,
            ),
            Span::raw(value.clone()),
        ]));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);

    if let Some(input) = form.focused_input() {
        let row = rows
            .iter()
            .position(|(field, _)| *field == form.focus)
            .unwrap_or(0) as u16;
        let x = inner.x + LABEL_WIDTH + input.visual_cursor() as u16;
        f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
    }
}

fn draw_table_form(f: &mut Frame, form: &TableForm, screen: Rect) {
    let area = centered_rect(44, 7, screen);
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Add New Table ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    const LABEL_WIDTH: u16 = 10;
    let rows = [
        (TableField::Name, "Name", form.name.value()),
        (TableField::QrCode, "QR Code", form.qr_code.value()),
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (field, label, value) in &rows {
        let label_style = if *field == form.focus {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", label, width = LABEL_WIDTH as usize),
                label_style,
            ),
            Span::raw(value.to_string()),
        ]));
    }
    if let Some(error) = &form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);

    let row = rows
        .iter()
        .position(|(field, _, _)| *field == form.focus)
        .unwrap_or(0) as u16;
    let x = inner.x + LABEL_WIDTH + form.focused_input().visual_cursor() as u16;
    f.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y + row));
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
