/// Gamepad input using gilrs, translated into the same `Command`s as the
/// keyboard.
///
/// Button mapping comes from `[gamepad]` in config.toml. Defaults:
///   D-pad / Left Stick    →  Up / Down / Left / Right
///   A / Start             →  Confirm
///   B / Select            →  Back
///   Y                     →  Sound test panel
///
/// Menus step one entry per press, so only fresh presses (edges) produce
/// commands. A stick pushed past the deadzone counts as one press until it
/// returns to centre.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::app::Command;
use crate::config::GamepadConfig;

const STICK_DEADZONE: f32 = 0.25;

/// Face, shoulder and menu buttons that can be bound to actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,
    B,
    X,
    Y,
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

/// Accepted config names, including the gilrs position names.
const BUTTON_NAMES: [(&str, Btn); 21] = [
    ("A", Btn::A), ("SOUTH", Btn::A),
    ("B", Btn::B), ("EAST", Btn::B),
    ("X", Btn::X), ("WEST", Btn::X),
    ("Y", Btn::Y), ("NORTH", Btn::Y),
    ("L1", Btn::L1), ("LB", Btn::L1), ("LEFTTRIGGER", Btn::L1),
    ("R1", Btn::R1), ("RB", Btn::R1), ("RIGHTTRIGGER", Btn::R1),
    ("L2", Btn::L2), ("LT", Btn::L2),
    ("R2", Btn::R2), ("RT", Btn::R2),
    ("START", Btn::Start),
    ("SELECT", Btn::Select), ("BACK", Btn::Select),
];

impl Btn {
    const COUNT: usize = 10;

    fn parse(name: &str) -> Option<Btn> {
        let upper = name.trim().to_uppercase();
        BUTTON_NAMES.iter().find(|(n, _)| *n == upper).map(|&(_, b)| b)
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        Some(match btn {
            Button::South => Btn::A,
            Button::East => Btn::B,
            Button::West => Btn::X,
            Button::North => Btn::Y,
            Button::LeftTrigger => Btn::L1,
            Button::RightTrigger => Btn::R1,
            Button::LeftTrigger2 => Btn::L2,
            Button::RightTrigger2 => Btn::R2,
            Button::Start => Btn::Start,
            Button::Select => Btn::Select,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    fn command(self) -> Command {
        match self {
            Dir::Up => Command::Up,
            Dir::Down => Command::Down,
            Dir::Left => Command::Left,
            Dir::Right => Command::Right,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_dpad(btn: Button) -> Option<Dir> {
        match btn {
            Button::DPadUp => Some(Dir::Up),
            Button::DPadDown => Some(Dir::Down),
            Button::DPadLeft => Some(Dir::Left),
            Button::DPadRight => Some(Dir::Right),
            _ => None,
        }
    }
}

/// Which directions a stick position counts as pushed, indexed like `Dir::ALL`.
fn stick_dirs(x: f32, y: f32) -> [bool; 4] {
    [y > STICK_DEADZONE, y < -STICK_DEADZONE, x < -STICK_DEADZONE, x > STICK_DEADZONE]
}

/// Held state plus a flag for a press that happened this frame.
#[derive(Clone, Copy, Debug, Default)]
struct Edge {
    held: bool,
    fresh: bool,
}

impl Edge {
    fn set(&mut self, down: bool) {
        if down && !self.held {
            self.fresh = true;
        }
        self.held = down;
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug)]
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    sound_panel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            cancel: vec![Btn::B, Btn::Select],
            sound_panel: vec![Btn::Y],
        }
    }
}

impl ActionMap {
    /// Names that don't parse are skipped; an empty result keeps the default.
    fn load(&mut self, cfg: &GamepadConfig) {
        let slots = [
            (&mut self.confirm, &cfg.confirm),
            (&mut self.cancel, &cfg.cancel),
            (&mut self.sound_panel, &cfg.sound_panel),
        ];
        for (slot, names) in slots {
            let parsed: Vec<Btn> = names.iter().filter_map(|n| Btn::parse(n)).collect();
            if parsed.len() < names.len() {
                log::warn!("unknown gamepad button in {names:?}");
            }
            if !parsed.is_empty() {
                *slot = parsed;
            }
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [Edge; Btn::COUNT],
    dpad: [Edge; 4],
    stick: [Edge; 4],
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::info!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            buttons: [Edge::default(); Btn::COUNT],
            dpad: [Edge::default(); 4],
            stick: [Edge::default(); 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.load(cfg);
        log::debug!("gamepad mapping: {:?}", self.action_map);
    }

    /// Call once per frame before `commands()`.
    pub fn update(&mut self) {
        for e in self.buttons.iter_mut().chain(&mut self.dpad).chain(&mut self.stick) {
            e.fresh = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();

        let pushed = stick_dirs(self.stick_x, self.stick_y);
        for (edge, down) in self.stick.iter_mut().zip(pushed) {
            edge.set(down);
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return;
        };
        let events: Vec<EventType> = std::iter::from_fn(|| gilrs.next_event()).map(|e| e.event).collect();

        for event in events {
            match event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, v, _) => self.stick_x = v,
                EventType::AxisChanged(Axis::LeftStickY, v, _) => self.stick_y = v,
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, down: bool) {
        self.connected = true;
        if let Some(dir) = Dir::from_dpad(gilrs_btn) {
            self.dpad[dir as usize].set(down);
        } else if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            self.buttons[btn as usize].set(down);
        }
    }

    #[cfg(feature = "gamepad")]
    fn release_all(&mut self) {
        self.buttons = [Edge::default(); Btn::COUNT];
        self.dpad = [Edge::default(); 4];
        self.stick = [Edge::default(); 4];
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }

    fn pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].fresh)
    }

    /// Commands for this frame's fresh presses.
    pub fn commands(&self) -> Vec<Command> {
        let mut out: Vec<Command> = Dir::ALL
            .iter()
            .filter(|&&d| self.dpad[d as usize].fresh || self.stick[d as usize].fresh)
            .map(|d| d.command())
            .collect();
        let map = &self.action_map;
        for (btns, cmd) in [
            (&map.confirm, Command::Confirm),
            (&map.cancel, Command::Back),
            (&map.sound_panel, Command::ToggleSoundPanel),
        ] {
            if self.pressed(btns) {
                out.push(cmd);
            }
        }
        out
    }
}
