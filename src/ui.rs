//! On-screen text and buttons
//!
//! Everything here is derived from sim state each frame. The browser layer
//! turns an [`Overlay`] into positioned DOM elements and routes clicks back
//! through [`hit_test`].

use glam::Vec2;

use crate::consts::*;
use crate::sim::intro::IntroState;
use crate::sim::level::{self, RewardKind};
use crate::sim::rect::Rect;
use crate::sim::state::{Banner, GamePhase, GameState, Outcome};

pub const TEXT_COLOR: [u8; 3] = [0, 0, 0];
pub const HINT_COLOR: [u8; 3] = [255, 230, 180];
pub const SUCCESS_COLOR: [u8; 3] = [0, 220, 0];
pub const FAILURE_COLOR: [u8; 3] = [255, 0, 0];
pub const BUTTON_GOLD: [u8; 3] = [255, 230, 140];
pub const BUTTON_DARK: [u8; 3] = [60, 60, 60];
pub const BUTTON_INK: [u8; 3] = [10, 10, 10];

pub const FONT_PX: f32 = 36.0;
pub const SMALL_FONT_PX: f32 = 30.0;
pub const BUTTON_FONT_PX: f32 = 32.0;

pub const CONTROL_HINT: &str = "PRESS ←/→ OR A/D KEYS TO MOVE THE CHARACTER";

/// Where a text line's position sits relative to the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub pos: Vec2,
    pub anchor: Anchor,
    pub color: [u8; 3],
    pub alpha: f32,
    pub font_px: f32,
}

impl TextLine {
    fn centered(text: impl Into<String>, pos: Vec2, color: [u8; 3], font_px: f32) -> Self {
        Self {
            text: text.into(),
            pos,
            anchor: Anchor::Center,
            color,
            alpha: 1.0,
            font_px,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    EnterGame,
    BackToMenu,
    Quit,
}

impl ButtonKind {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonKind::EnterGame => "Enter Game",
            ButtonKind::BackToMenu => "BACK TO MENU",
            ButtonKind::Quit => "QUIT",
        }
    }
}

/// Light buttons are gold on dark border, dark buttons the inverse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Light,
    Dark,
}

impl ButtonStyle {
    /// Background, border and label colors
    pub fn colors(&self) -> ([u8; 3], [u8; 3], [u8; 3]) {
        match self {
            ButtonStyle::Light => (BUTTON_GOLD, BUTTON_DARK, BUTTON_INK),
            ButtonStyle::Dark => (BUTTON_DARK, BUTTON_GOLD, BUTTON_GOLD),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    pub kind: ButtonKind,
    pub rect: Rect,
    pub style: ButtonStyle,
}

/// Full-screen banner between levels
#[derive(Debug, Clone, PartialEq)]
pub struct BannerView {
    pub title: String,
    pub color: [u8; 3],
    /// Reward shown under the title
    pub reward: Option<RewardKind>,
}

/// All text and buttons for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub status: Option<TextLine>,
    pub countdown: Option<TextLine>,
    pub control_hint: Option<TextLine>,
    pub popups: Vec<TextLine>,
    pub banner: Option<BannerView>,
    /// Centered messages (intro goal, end-screen result)
    pub messages: Vec<TextLine>,
    /// Opacity of the black backdrop behind end-screen content
    pub backdrop: f32,
    pub buttons: Vec<Button>,
}

/// Hearts and coins, top left
pub fn status_text(hearts: u8, coins: u32) -> String {
    format!("❤️: {}    💰: {}", hearts, coins)
}

pub fn countdown_text(secs_left: u32) -> String {
    format!("{}s left before you starve", secs_left)
}

/// Goal line for a level, used by the intro and the level start banner
pub fn goal_text(coins_required: u32, reward: RewardKind) -> String {
    format!(
        "Collect {} coins to trade for a {}",
        coins_required,
        reward.name()
    )
}

pub fn banner_view(banner: &Banner) -> BannerView {
    match *banner {
        Banner::LevelCleared { reward, .. } => BannerView {
            title: format!("CONGRATULATIONS! YOU GOT A {}", reward.name().to_uppercase()),
            color: SUCCESS_COLOR,
            reward: Some(reward),
        },
        Banner::LevelStart { level: index } => {
            let (title, reward) = match level::level(index) {
                Some(l) => (
                    format!("LEVEL {}: {}", index + 1, goal_text(l.coins_required, l.reward)),
                    Some(l.reward),
                ),
                None => (format!("LEVEL {}", index + 1), None),
            };
            BannerView {
                title,
                color: HINT_COLOR,
                reward,
            }
        }
        Banner::TimeUp => BannerView {
            title: "Time's up! Not enough coins, challenge failed.".to_string(),
            color: FAILURE_COLOR,
            reward: None,
        },
    }
}

pub fn outcome_message(outcome: Outcome) -> (&'static str, [u8; 3]) {
    match outcome {
        Outcome::Victory => ("All levels cleared!", SUCCESS_COLOR),
        Outcome::TimeUp => ("GAME OVER", FAILURE_COLOR),
        Outcome::Died => ("Game Over - You Died", FAILURE_COLOR),
    }
}

/// Rough rendered width of `text`; half an em per glyph
pub fn estimate_text_width(text: &str, font_px: f32) -> f32 {
    text.chars().count() as f32 * font_px * 0.5
}

/// Button sized around its label, horizontally centered at `top`
fn button(kind: ButtonKind, top: f32, padding: Vec2, font_px: f32, style: ButtonStyle) -> Button {
    let size = Vec2::new(
        estimate_text_width(kind.label(), font_px),
        font_px,
    ) + padding * 2.0;
    Button {
        kind,
        rect: Rect::new((WIDTH - size.x) / 2.0, top, size.x, size.y),
        style,
    }
}

/// Back to Menu above Quit, just below the screen center
pub fn end_buttons() -> Vec<Button> {
    let padding = Vec2::new(20.0, 14.0);
    let back = button(
        ButtonKind::BackToMenu,
        HEIGHT / 2.0 + 20.0,
        padding,
        BUTTON_FONT_PX,
        ButtonStyle::Light,
    );
    let quit = button(
        ButtonKind::Quit,
        back.rect.bottom() + 12.0,
        padding,
        BUTTON_FONT_PX,
        ButtonStyle::Dark,
    );
    vec![back, quit]
}

pub fn enter_button() -> Button {
    button(
        ButtonKind::EnterGame,
        HEIGHT / 2.0 + 60.0,
        Vec2::new(14.0, 8.0),
        SMALL_FONT_PX,
        ButtonStyle::Light,
    )
}

/// First button under `point` (screen pixels)
pub fn hit_test(buttons: &[Button], point: Vec2) -> Option<ButtonKind> {
    buttons
        .iter()
        .find(|b| b.rect.contains_point(point))
        .map(|b| b.kind)
}

/// Overlay for the intro cutscene
pub fn intro_overlay(intro: &IntroState) -> Overlay {
    if !intro.prompt_visible() {
        return Overlay::default();
    }
    let first = &level::LEVELS[0];
    let center = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
    Overlay {
        messages: vec![
            TextLine::centered(
                goal_text(first.coins_required, first.reward),
                center - Vec2::new(0.0, 40.0),
                HINT_COLOR,
                FONT_PX,
            ),
            TextLine::centered("Don't starve", center, HINT_COLOR, FONT_PX),
        ],
        buttons: vec![enter_button()],
        ..Default::default()
    }
}

/// Overlay for a run in progress or just ended
pub fn game_overlay(state: &GameState, show_control_hint: bool) -> Overlay {
    let mut overlay = Overlay {
        status: Some(TextLine {
            text: status_text(state.hearts, state.coins),
            pos: Vec2::new(10.0, 10.0),
            anchor: Anchor::TopLeft,
            color: TEXT_COLOR,
            alpha: 1.0,
            font_px: FONT_PX,
        }),
        ..Default::default()
    };

    match state.phase {
        GamePhase::Playing => {
            if let Some(secs) = state.time_left_secs() {
                overlay.countdown = Some(TextLine::centered(
                    countdown_text(secs),
                    Vec2::new(WIDTH / 2.0, 60.0),
                    TEXT_COLOR,
                    FONT_PX,
                ));
            }
            if show_control_hint && state.control_hint_ticks > 0 {
                overlay.control_hint = Some(TextLine::centered(
                    CONTROL_HINT,
                    Vec2::new(WIDTH / 2.0, HEIGHT / 2.0 - 60.0),
                    HINT_COLOR,
                    SMALL_FONT_PX,
                ));
            }
        }
        GamePhase::Banner { banner, .. } => overlay.banner = Some(banner_view(&banner)),
        GamePhase::Dying { .. } => {}
        GamePhase::Ended(outcome) => {
            let (text, color) = outcome_message(outcome);
            overlay.messages.push(TextLine::centered(
                text,
                Vec2::new(WIDTH / 2.0, HEIGHT / 2.0 - 80.0),
                color,
                FONT_PX,
            ));
            overlay.backdrop = 180.0 / 255.0;
            overlay.buttons = end_buttons();
        }
    }

    let now = state.time_ticks;
    overlay.popups = state
        .popups
        .iter()
        .map(|p| TextLine {
            text: p.style.text().to_string(),
            pos: p.position(now),
            anchor: Anchor::Center,
            color: p.style.color(),
            alpha: p.alpha(now),
            font_px: SMALL_FONT_PX,
        })
        .collect();

    overlay
}

/// Overlay shown after Quit
pub fn farewell_overlay() -> Overlay {
    Overlay {
        messages: vec![TextLine::centered(
            "Thanks for playing!",
            Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            HINT_COLOR,
            FONT_PX,
        )],
        backdrop: 1.0,
        ..Default::default()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn css_color(c: [u8; 3], alpha: f32) -> String {
    format!("rgba({},{},{},{:.3})", c[0], c[1], c[2], alpha)
}

fn text_html(line: &TextLine, class: &str) -> String {
    let transform = match line.anchor {
        Anchor::TopLeft => "",
        Anchor::Center => "transform:translate(-50%,-50%);",
    };
    format!(
        r#"<div class="{}" style="left:{:.1}px;top:{:.1}px;{}color:{};font-size:{}px">{}</div>"#,
        class,
        line.pos.x,
        line.pos.y,
        transform,
        css_color(line.color, line.alpha),
        line.font_px,
        escape_html(&line.text)
    )
}

/// Markup for the overlay layer, laid out in 800×600 screen pixels
pub fn overlay_html(overlay: &Overlay) -> String {
    let mut html = String::new();

    if overlay.backdrop > 0.0 {
        html.push_str(&format!(
            r#"<div class="backdrop" style="background:rgba(0,0,0,{:.3})"></div>"#,
            overlay.backdrop
        ));
    }
    if let Some(status) = &overlay.status {
        html.push_str(&text_html(status, "text status"));
    }
    if let Some(countdown) = &overlay.countdown {
        html.push_str(&text_html(countdown, "text countdown"));
    }
    if let Some(hint) = &overlay.control_hint {
        html.push_str(&text_html(hint, "text hint"));
    }
    for popup in &overlay.popups {
        html.push_str(&text_html(popup, "text popup"));
    }
    if let Some(banner) = &overlay.banner {
        let reward = banner
            .reward
            .map(|r| format!(r#"<div class="reward reward-{}"></div>"#, r.name().replace(' ', "-")))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<div class="banner"><div class="banner-title" style="color:{}">{}</div>{}</div>"#,
            css_color(banner.color, 1.0),
            escape_html(&banner.title),
            reward
        ));
    }
    for message in &overlay.messages {
        html.push_str(&text_html(message, "text message"));
    }
    for button in &overlay.buttons {
        let style = match button.style {
            ButtonStyle::Light => "light",
            ButtonStyle::Dark => "dark",
        };
        let (background, border, ink) = button.style.colors();
        html.push_str(&format!(
            r#"<div class="button {}" style="left:{:.1}px;top:{:.1}px;width:{:.1}px;height:{:.1}px;background:{};border-color:{};color:{}">{}</div>"#,
            style,
            button.rect.left(),
            button.rect.top(),
            button.rect.width(),
            button.rect.height(),
            css_color(background, 1.0),
            css_color(border, 1.0),
            css_color(ink, 1.0),
            escape_html(button.kind.label())
        ));
    }

    html
}
