//! Reply message builders.

use crate::catalog::Catalog;
use line_client::{truncate_label, Action, Message};
use report_store::{RegistrationSession, Toggle, Unit, UserRegistration};
use serde_json::{json, Value};

/// Buttons per catalog bubble.
const UNITS_PER_BUBBLE: usize = 8;

/// LINE carousel limit.
const MAX_CAROUSEL_BUBBLES: usize = 12;

pub const REGISTER_HINT: &str = "Type \"register\" (ลงทะเบียน) to choose your units.";

const ACCENT_RED: &str = "#DC2626";
const ACCENT_GREEN: &str = "#16A34A";
const ACCENT_BLUE: &str = "#2563EB";
const MUTED: &str = "#666666";

/// Card sent when a user adds the bot.
pub fn welcome(display_name: Option<&str>) -> Message {
    let greeting = match display_name {
        Some(name) => format!("Hello {} 👋", name),
        None => "Hello 👋".to_string(),
    };

    let contents = json!({
        "type": "bubble",
        "hero": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {"type": "text", "text": "🚨 Unsafe-Report", "weight": "bold", "size": "xl", "color": ACCENT_RED, "align": "center"},
                {"type": "text", "text": "Unsafe act & condition reporting", "size": "sm", "color": MUTED, "align": "center", "margin": "sm"}
            ],
            "paddingAll": "20px",
            "backgroundColor": "#FEF2F2"
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {"type": "text", "text": greeting, "weight": "bold", "size": "md"},
                {"type": "text", "text": "This bot is restricted to authorized safety personnel. It sends you new safety reports for the units you are responsible for.", "size": "sm", "color": MUTED, "margin": "md", "wrap": true},
                {"type": "separator", "margin": "lg"},
                {"type": "text", "text": "📋 Register the units you cover", "size": "sm", "margin": "lg", "wrap": true},
                {"type": "text", "text": REGISTER_HINT, "size": "sm", "color": ACCENT_BLUE, "margin": "sm", "wrap": true}
            ]
        }
    });

    Message::flex("Welcome to Unsafe-Report", contents)
}

fn button(label: &str, text: &str, style: &str) -> Value {
    json!({
        "type": "button",
        "style": style,
        "height": "sm",
        "margin": "sm",
        "action": {"type": "message", "label": truncate_label(label), "text": text}
    })
}

fn bubble(title: &str, buttons: Vec<Value>) -> Value {
    json!({
        "type": "bubble",
        "size": "kilo",
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {"type": "text", "text": title, "weight": "bold", "size": "md", "wrap": true},
                {"type": "separator", "margin": "md"},
                {"type": "box", "layout": "vertical", "margin": "md", "contents": buttons}
            ]
        }
    })
}

/// Catalog as a carousel: unit pages, a preset page and a control page.
pub fn catalog_carousel(catalog: &Catalog) -> Message {
    let reserved = if catalog.presets().is_empty() { 1 } else { 2 };
    let pages: Vec<&[Unit]> = catalog
        .units()
        .chunks(UNITS_PER_BUBBLE)
        .take(MAX_CAROUSEL_BUBBLES - reserved)
        .collect();
    let page_count = pages.len();

    let mut bubbles: Vec<Value> = pages
        .into_iter()
        .enumerate()
        .map(|(i, units)| {
            let buttons = units
                .iter()
                .map(|u| button(&u.name, &u.name, "secondary"))
                .collect();
            bubble(&format!("🏢 Units ({}/{})", i + 1, page_count), buttons)
        })
        .collect();

    if !catalog.presets().is_empty() {
        let buttons = catalog
            .presets()
            .iter()
            .map(|p| button(&p.label, &p.label, "primary"))
            .collect();
        bubbles.push(bubble("⚡ Quick roles", buttons));
    }

    bubbles.push(bubble(
        "✅ Done selecting?",
        vec![
            button("Finish", "finish", "primary"),
            button("Cancel", "cancel", "secondary"),
        ],
    ));

    Message::flex(
        "Select your units",
        json!({"type": "carousel", "contents": bubbles}),
    )
}

fn numbered(units: &[Unit]) -> String {
    units
        .iter()
        .enumerate()
        .map(|(i, u)| format!("{}. {}", i + 1, u.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn session_actions() -> Vec<Action> {
    vec![
        Action::message("Finish", "finish"),
        Action::message("Cancel", "cancel"),
    ]
}

/// Instructions sent with the catalog.
pub fn registration_instructions(session: &RegistrationSession, resumed: bool) -> Message {
    let mut text = String::from(
        "📋 Select the units you are responsible for.\n\n\
         Tap a unit to add it, tap it again to remove it. \
         Choose a quick role to register a preset set at once.\n\
         Type \"finish\" when done or \"cancel\" to stop.",
    );

    if resumed && !session.is_empty() {
        text.push_str(&format!(
            "\n\nAlready selected ({}):\n{}",
            session.selected_units().len(),
            numbered(session.selected_units())
        ));
    }

    Message::text(text)
}

/// Reply to a toggle.
pub fn selection(session: &RegistrationSession, toggle: Toggle, unit: &Unit) -> Message {
    let headline = match toggle {
        Toggle::Added => format!("✅ Added: {}", unit.name),
        Toggle::Removed => format!("➖ Removed: {}", unit.name),
    };

    let body = if session.is_empty() {
        "No units selected.".to_string()
    } else {
        format!(
            "Selected units ({}):\n{}",
            session.selected_units().len(),
            numbered(session.selected_units())
        )
    };

    Message::text(format!(
        "{}\n\n{}\n\nType \"finish\" to confirm.",
        headline, body
    ))
    .with_quick_reply(session_actions())
}

/// Several units matched the text.
pub fn ambiguous(candidates: &[&Unit]) -> Message {
    let actions = candidates
        .iter()
        .map(|u| Action::message(&u.name, u.name.clone()))
        .collect();
    let names = candidates
        .iter()
        .map(|u| format!("• {}", u.name))
        .collect::<Vec<_>>()
        .join("\n");

    Message::text(format!(
        "🤔 More than one unit matches. Please choose one:\n\n{}",
        names
    ))
    .with_quick_reply(actions)
}

/// Confirmation card after a registration is committed.
pub fn registered(registration: &UserRegistration) -> Message {
    let mut rows = vec![json!({
        "type": "box",
        "layout": "baseline",
        "contents": [
            {"type": "text", "text": "Name:", "size": "sm", "color": MUTED, "flex": 2},
            {"type": "text", "text": display_or_dash(&registration.display_name), "size": "sm", "flex": 5, "wrap": true}
        ]
    })];

    if let Some(role) = &registration.role {
        rows.push(json!({
            "type": "box",
            "layout": "baseline",
            "margin": "sm",
            "contents": [
                {"type": "text", "text": "Role:", "size": "sm", "color": MUTED, "flex": 2},
                {"type": "text", "text": role, "size": "sm", "flex": 5, "wrap": true}
            ]
        }));
    }

    rows.push(json!({
        "type": "box",
        "layout": "baseline",
        "margin": "sm",
        "contents": [
            {"type": "text", "text": "Units:", "size": "sm", "color": MUTED, "flex": 2},
            {"type": "text", "text": numbered(&registration.units), "size": "sm", "flex": 5, "wrap": true}
        ]
    }));

    let contents = json!({
        "type": "bubble",
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {"type": "text", "text": "✅ Registration complete!", "weight": "bold", "size": "lg", "color": ACCENT_GREEN},
                {"type": "separator", "margin": "md"},
                {"type": "box", "layout": "vertical", "margin": "lg", "contents": rows},
                {"type": "text", "text": "🔔 You will be notified when a new report is filed for these units.", "size": "xs", "color": MUTED, "margin": "lg", "wrap": true}
            ]
        }
    });

    Message::flex("Registration complete", contents)
}

fn display_or_dash(name: &str) -> &str {
    if name.is_empty() {
        "-"
    } else {
        name
    }
}

/// Current registration, if any.
pub fn status(registration: Option<&UserRegistration>) -> Message {
    let Some(registration) = registration.filter(|r| !r.unit_names().is_empty()) else {
        return Message::text(format!("❌ You are not registered yet.\n\n{}", REGISTER_HINT));
    };

    let units = registration
        .unit_names()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    let mut text = format!(
        "📋 Registration status\n\n{}\n👤 Name: {}",
        if registration.is_active() {
            "✅ Active"
        } else {
            "⏸️ Inactive"
        },
        display_or_dash(&registration.display_name)
    );
    if let Some(role) = &registration.role {
        text.push_str(&format!("\n🎖️ Role: {}", role));
    }
    text.push_str(&format!("\n🏢 Units:\n{}", units));
    if let Some(at) = registration.registered_at {
        text.push_str(&format!("\n📅 Registered: {}", at.format("%d/%m/%Y")));
    }

    Message::text(text)
}

pub fn help() -> Message {
    Message::text(
        "📚 Commands\n\n\
         • register (ลงทะเบียน) - choose your units\n\
         • finish (เสร็จสิ้น) - confirm your selection\n\
         • cancel (ยกเลิก) - stop selecting, keep your current registration\n\
         • reset (รีเซ็ต) - remove your registration\n\
         • status (สถานะ) - show your registration\n\
         • help (ช่วยเหลือ) - show this message\n\n\
         🔔 New safety reports for your units are sent here automatically.",
    )
}

pub fn fallback() -> Message {
    Message::text("🤖 Hello!\n\nType \"help\" (ช่วยเหลือ) to see what I can do.")
}

pub fn catalog_unavailable() -> Message {
    Message::text("❌ No units are configured. Please contact the administrator.")
}

pub fn empty_selection() -> Message {
    Message::text(format!(
        "⚠️ You have not selected any units yet.\n\nTap a unit to select it, then type \"finish\".\n{}",
        REGISTER_HINT
    ))
}

pub fn preset_unavailable(label: &str) -> Message {
    Message::text(format!(
        "❌ The \"{}\" role has no units in the current catalog. Please select units manually.",
        label
    ))
}

pub fn cancelled(had_session: bool) -> Message {
    if had_session {
        Message::text("🚫 Selection cancelled. Your previous registration (if any) is unchanged.")
    } else {
        Message::text(format!("Nothing to cancel.\n\n{}", REGISTER_HINT))
    }
}

pub fn reset_done() -> Message {
    Message::text(format!(
        "🗑️ Your registration has been removed. You will no longer receive notifications.\n\n{}",
        REGISTER_HINT
    ))
}
