//! HTML for the three screens. Pure string building so the markup can be
//! checked without a browser; the wasm glue in `app.rs` swaps it into the page
//! and wires the `data-action` buttons.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::card::{CardIntent, CardState, Direction, Feedback};
use crate::catalog::Catalog;
use crate::config::PracticeConfig;
use crate::route::Route;
use crate::session::SessionState;

// Ids the glue looks elements up by.
pub const DRAFT_ID: &str = "sp-draft";
pub const FEEDBACK_ID: &str = "sp-feedback";
pub const SPEAK_ID: &str = "sp-speak";

/// Button actions carried in `data-action`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    ToggleAnswer,
    ToggleDirection,
    Speak,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Next => "next",
            Action::Previous => "previous",
            Action::ToggleAnswer => "toggle-answer",
            Action::ToggleDirection => "toggle-direction",
            Action::Speak => "speak",
        }
    }

    /// Navigation buttons forward an intent to the session; the rest act on
    /// the card itself.
    pub fn intent(self) -> Option<CardIntent> {
        match self {
            Action::Next => Some(CardIntent::Next),
            Action::Previous => Some(CardIntent::Previous),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<Action> {
        match s {
            "next" => Some(Action::Next),
            "previous" => Some(Action::Previous),
            "toggle-answer" => Some(Action::ToggleAnswer),
            "toggle-direction" => Some(Action::ToggleDirection),
            "speak" => Some(Action::Speak),
            _ => None,
        }
    }
}

const PAGE_STYLE: &str = "max-width:42rem; margin:0 auto; padding:1rem; font-family:'Noto Sans SC','Noto Sans JP',sans-serif; color:#1f2937;";
const CARD_STYLE: &str = "background:#fff; border-radius:12px; box-shadow:0 4px 18px rgba(0,0,0,0.12); overflow:hidden;";
const BUTTON_STYLE: &str = "padding:6px 14px; border-radius:8px; border:1px solid #d1d5db; background:#f3f4f6; cursor:pointer;";

fn button(action: Action, label: &str, extra: &str) -> String {
    format!(
        "<button data-action=\"{}\" style=\"{BUTTON_STYLE}\"{extra}>{}</button>",
        action.as_str(),
        text(label)
    )
}

pub fn home_html(catalog: &Catalog) -> String {
    let mut out = format!(
        "<div style=\"{PAGE_STYLE}\"><h1 style=\"text-align:center\">选择日剧</h1>\
         <p style=\"text-align:center; color:#6b7280\">选择你想练习的日剧台词</p>"
    );
    for show in catalog.shows() {
        let href = Route::Episodes { show: show.id.clone() }.to_hash();
        let cover = if show.cover_image.is_empty() {
            String::new()
        } else {
            format!(
                "<img src=\"{}\" alt=\"{}\" style=\"width:100%; max-height:12rem; object-fit:cover; border-radius:0.5rem;\">",
                attr(&show.cover_image),
                attr(&show.title)
            )
        };
        out.push_str(&format!(
            "<a href=\"{}\" style=\"display:block; {CARD_STYLE} padding:1.25rem; margin-bottom:1rem; text-decoration:none; color:inherit;\">\
             {cover}<h2>{}</h2><p>{}</p><span>{} 集</span></a>",
            attr(&href),
            text(&show.title),
            text(&show.description),
            show.episode_count
        ));
    }
    out.push_str("</div>");
    out
}

pub fn episodes_html(catalog: &Catalog, show_id: &str) -> String {
    let mut out = format!(
        "<div style=\"{PAGE_STYLE}\"><a href=\"{}\">← 返回剧集选择</a>",
        attr(&Route::Home.to_hash())
    );
    if let Some(show) = catalog.show_by_id(show_id) {
        out.push_str(&format!(
            "<h1 style=\"text-align:center\">{}</h1><p style=\"text-align:center; color:#6b7280\">{}</p>",
            text(&show.title),
            text(&show.description)
        ));
    }
    out.push_str("<h2 style=\"text-align:center\">选择集数</h2>");
    let episodes = catalog.episodes_by_show(show_id);
    if episodes.is_empty() {
        out.push_str("<p style=\"text-align:center\">暂无剧集数据</p>");
    }
    for ep in episodes {
        let href = Route::Practice {
            show: show_id.to_string(),
            episode: ep.number,
        }
        .to_hash();
        out.push_str(&format!(
            "<a href=\"{}\" style=\"display:block; {CARD_STYLE} padding:1rem; margin-bottom:0.75rem; text-decoration:none; color:inherit;\">\
             <strong>第{}集</strong> {} <small>{}句台词</small></a>",
            attr(&href),
            ep.number,
            text(&ep.title),
            ep.line_count
        ));
    }
    out.push_str("</div>");
    out
}

pub fn feedback_html(feedback: Feedback) -> String {
    let Some(msg) = feedback.message() else {
        return String::new();
    };
    let colors = match feedback {
        Feedback::Positive => "background:#ecfdf5; color:#047857;",
        _ => "background:#fffbeb; color:#b45309;",
    };
    format!(
        "<p style=\"{colors} padding:0.75rem; border-radius:8px;\">{}</p>",
        text(msg)
    )
}

pub fn practice_html(
    state: &SessionState,
    card: &CardState,
    config: &PracticeConfig,
    speech_available: bool,
) -> String {
    let line = state.current_line();
    let direction = card.direction();
    let (current, total) = state.position();
    let forward = direction == Direction::SourceToTarget;

    let mut out = format!(
        "<div style=\"{PAGE_STYLE}\"><div style=\"text-align:center; margin-bottom:1.5rem\">\
         <h2 style=\"color:#4b5563; margin:0\">{}</h2><h1 style=\"margin:0.25rem 0\">{}</h1>\
         <p>第 {current} 题 / 共 {total} 题</p>\
         <div style=\"background:#e5e7eb; border-radius:9999px; height:10px\">\
         <div style=\"background:#3b82f6; border-radius:9999px; height:10px; width:{:.1}%\"></div></div></div>",
        text(&state.show_title),
        text(&state.episode_title),
        state.progress_percent()
    );

    out.push_str(&format!("<div style=\"{CARD_STYLE}\">"));
    out.push_str(&format!(
        "<div style=\"background:#4f46e5; color:#fff; padding:0.5rem 1rem; display:flex; justify-content:space-between\">\
         <span>{} 级别{}</span><span>第 {} 集</span></div>",
        line.difficulty.label(),
        line.context
            .as_deref()
            .map(|c| format!(" • {}", text(c)))
            .unwrap_or_default(),
        line.episode
    ));

    out.push_str("<div style=\"padding:1.5rem\">");
    let speak_disabled = if card.speaking() || !speech_available {
        " disabled"
    } else {
        ""
    };
    out.push_str(&format!(
        "<div style=\"display:flex; justify-content:space-between\"><h3>{}</h3><div>{} {}</div></div>",
        if forward { "日语原文" } else { "中文原文" },
        button(Action::ToggleDirection, "⇄", ""),
        button(Action::Speak, "🔊", &format!(" id=\"{SPEAK_ID}\"{speak_disabled}")),
    ));
    out.push_str(&format!(
        "<div style=\"background:#f9fafb; padding:1rem; border-radius:8px\"><p style=\"font-size:1.25rem\">{}</p>",
        text(direction.prompt_text(line))
    ));
    if forward {
        if let Some(romaji) = &line.transliteration {
            out.push_str(&format!(
                "<p style=\"color:#6b7280; font-style:italic\">{}</p>",
                text(romaji)
            ));
        }
    }
    out.push_str("</div>");

    out.push_str(&format!(
        "<h3>{}</h3><textarea id=\"{DRAFT_ID}\" placeholder=\"{}\" style=\"width:100%; min-height:120px; box-sizing:border-box\">{}</textarea>",
        if forward { "我的翻译" } else { "我的日语翻译" },
        if forward { "请输入你的中文翻译..." } else { "请输入你的日语翻译..." },
        text(card.draft())
    ));

    out.push_str(&format!(
        "<div style=\"display:flex; justify-content:space-between; align-items:center\"><h3>{}</h3>{}</div>",
        if forward { "参考答案" } else { "日语参考译文" },
        button(
            Action::ToggleAnswer,
            if card.answer_revealed() { "隐藏答案" } else { "显示答案" },
            ""
        )
    ));
    if card.answer_revealed() {
        out.push_str(&format!(
            "<p style=\"background:#eff6ff; padding:1rem; border-radius:8px\">{}</p>",
            text(direction.answer_text(line))
        ));
    } else {
        out.push_str("<p style=\"background:#f3f4f6; padding:1rem; border-radius:8px; color:#6b7280; font-style:italic\">点击\"显示答案\"查看参考翻译</p>");
    }
    out.push_str(&format!(
        "<div id=\"{FEEDBACK_ID}\">{}</div>",
        feedback_html(card.visible_feedback(line, config))
    ));

    out.push_str(&format!(
        "<div style=\"display:flex; justify-content:space-between; border-top:1px solid #e5e7eb; padding-top:1rem\">{}{}</div>",
        button(Action::Previous, "← 上一题", ""),
        button(Action::Next, "下一题 →", "")
    ));
    out.push_str("</div></div>");

    let back = Route::episodes_or_home(Some(state.show_id()));
    out.push_str(&format!(
        "<p style=\"text-align:center\"><a href=\"{}\">← 返回集数选择</a></p></div>",
        attr(&back.to_hash())
    ));
    out
}
