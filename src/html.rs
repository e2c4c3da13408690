//! Static HTML snapshot of the board.
//!
//! Mirrors the markup of the browser board: one container per column tagged
//! with `data-status`, draggable cards tagged with `data-task-id`. All user
//! text goes through `html_escape` before it reaches the markup.

use std::fmt;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::stats::Stats;
use crate::view::{BoardView, CardView, ColumnBody, ColumnView};

pub fn render_board(view: &BoardView, stats: &Stats) -> String {
    BoardHtml { view, stats }.to_string()
}

/// Board markup, written straight into whatever formatter displays it.
pub struct BoardHtml<'a> {
    pub view: &'a BoardView,
    pub stats: &'a Stats,
}

impl fmt::Display for BoardHtml<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<div class=\"stats\">")?;
        for (id, value) in [
            ("totalTasks", self.stats.total),
            ("todoCount", self.stats.todo),
            ("inProgressCount", self.stats.in_progress),
            ("completedCount", self.stats.done),
        ] {
            writeln!(f, "    <span id=\"{id}\">{value}</span>")?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "<div class=\"board\">")?;
        for column in &self.view.columns {
            write_column(f, column)?;
        }
        writeln!(f, "</div>")
    }
}

fn write_column(f: &mut fmt::Formatter<'_>, column: &ColumnView) -> fmt::Result {
    writeln!(
        f,
        "<section class=\"column\" data-status=\"{}\">",
        column.status.as_str()
    )?;
    writeln!(
        f,
        "    <h2>{} <span class=\"count\">{}</span></h2>",
        column.title, column.count
    )?;
    match &column.body {
        ColumnBody::Empty(empty) => {
            writeln!(f, "    <div class=\"empty-state\">")?;
            writeln!(f, "        <i class=\"fas fa-{}\"></i>", empty.icon)?;
            writeln!(f, "        <p>{}</p>", empty.message)?;
            writeln!(f, "    </div>")?;
        }
        ColumnBody::Cards(cards) => {
            for card in cards {
                write_card(f, card)?;
            }
        }
    }
    writeln!(f, "</section>")
}

fn write_card(f: &mut fmt::Formatter<'_>, card: &CardView) -> fmt::Result {
    let class = if card.dragging {
        "task-card dragging"
    } else {
        "task-card"
    };
    writeln!(
        f,
        "    <div class=\"{class}\" draggable=\"true\" data-task-id=\"{}\">",
        card.id
    )?;
    writeln!(f, "        <div class=\"task-header\">")?;
    writeln!(
        f,
        "            <h3 class=\"task-title\">{}</h3>",
        encode_text(&card.title)
    )?;
    writeln!(
        f,
        "            <button class=\"task-delete\" data-task-id=\"{}\" title=\"Delete {}\"><i class=\"fas fa-trash\"></i></button>",
        card.id,
        encode_double_quoted_attribute(&card.title)
    )?;
    writeln!(f, "        </div>")?;
    if let Some(description) = &card.description {
        writeln!(
            f,
            "        <p class=\"task-description\">{}</p>",
            encode_text(description)
        )?;
    }
    writeln!(
        f,
        "        <p class=\"task-date\">{}</p>",
        encode_text(&card.created_at)
    )?;
    writeln!(f, "    </div>")
}
