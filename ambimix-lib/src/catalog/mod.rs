//! Static sound catalog.
//!
//! Every ambient sound carries its category explicitly. Locators are
//! site-relative (`/sounds/<category>/<file>.mp3`) and are resolved against a
//! sounds directory with [`resolve_locator`].

mod presets;

use std::path::{Path, PathBuf};

use serde::Serialize;

pub use presets::{built_in_preset, built_in_presets};

/// Category a sound is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    Nature,
    Rain,
    Noise,
    Study,
    Cozy,
    Transport,
    City,
    Machine,
}

impl SoundCategory {
    /// Display order used by every listing.
    pub const ALL: [SoundCategory; 8] = [
        SoundCategory::Nature,
        SoundCategory::Rain,
        SoundCategory::Noise,
        SoundCategory::Study,
        SoundCategory::Cozy,
        SoundCategory::Transport,
        SoundCategory::City,
        SoundCategory::Machine,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SoundCategory::Nature => "nature",
            SoundCategory::Rain => "rain",
            SoundCategory::Noise => "noise",
            SoundCategory::Study => "study",
            SoundCategory::Cozy => "cozy",
            SoundCategory::Transport => "transport",
            SoundCategory::City => "city",
            SoundCategory::Machine => "machine",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SoundCategory::Nature => "Nature",
            SoundCategory::Rain => "Rain",
            SoundCategory::Noise => "Noise",
            SoundCategory::Study => "Study",
            SoundCategory::Cozy => "Cozy",
            SoundCategory::Transport => "Transport",
            SoundCategory::City => "City",
            SoundCategory::Machine => "Machine",
        }
    }

    pub fn vn(&self) -> &'static str {
        match self {
            SoundCategory::Nature => "Thiên nhiên",
            SoundCategory::Rain => "Mưa",
            SoundCategory::Noise => "Tiếng ồn",
            SoundCategory::Study => "Học tập",
            SoundCategory::Cozy => "Ấm cúng",
            SoundCategory::Transport => "Phương tiện",
            SoundCategory::City => "Thành phố",
            SoundCategory::Machine => "Máy móc",
        }
    }
}

/// One catalog entry. Immutable, defined at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SoundItem {
    pub id: &'static str,
    pub category: SoundCategory,
    pub label: &'static str,
    pub vn: &'static str,
    pub icon: &'static str,
    pub url: &'static str,
}

/// A one-shot alarm sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmItem {
    pub id: &'static str,
    pub label: &'static str,
    pub vn: &'static str,
    pub url: &'static str,
}

macro_rules! sound {
    ($id:literal, $category:ident, $label:literal, $vn:literal, $icon:literal, $url:literal) => {
        SoundItem {
            id: $id,
            category: SoundCategory::$category,
            label: $label,
            vn: $vn,
            icon: $icon,
            url: $url,
        }
    };
}

static SOUNDS: &[SoundItem] = &[
    sound!("campfire", Nature, "Campfire", "Lửa trại", "🔥", "/sounds/nature/campfire.mp3"),
    sound!("droplets", Nature, "Droplets", "Giọt nước", "💧", "/sounds/nature/droplets.mp3"),
    sound!("river", Nature, "River", "Dòng sông", "🏞️", "/sounds/nature/river.mp3"),
    sound!("waves", Nature, "Waves", "Sóng biển", "🌊", "/sounds/nature/waves.mp3"),
    sound!("wind-in-trees", Nature, "Wind in Trees", "Gió trong cây", "🌳", "/sounds/nature/wind-in-trees.mp3"),
    sound!("wind", Nature, "Wind", "Gió", "💨", "/sounds/nature/wind.mp3"),
    sound!("birds", Nature, "Birds", "Chim hót", "🐦", "/sounds/nature/birds.mp3"),
    sound!("night-crickets", Nature, "Night Crickets", "Dế đêm", "🦗", "/sounds/nature/night-crickets.mp3"),
    sound!("fireplace", Nature, "Fireplace", "Lò sưởi", "🪵", "/sounds/nature/fireplace.mp3"),
    sound!("rain", Rain, "Rain", "Mưa", "☔", "/sounds/rain/rain.mp3"),
    sound!("heavy-rain", Rain, "Heavy Rain", "Mưa lớn", "🌧️", "/sounds/rain/heavy-rain.mp3"),
    sound!("light-rain", Rain, "Light Rain", "Mưa nhỏ", "🌦️", "/sounds/rain/light-rain.mp3"),
    sound!("rain-on-leaves", Rain, "Rain on Leaves", "Mưa trên lá", "🍃", "/sounds/rain/rain-on-leaves.mp3"),
    sound!("rain-on-window", Rain, "Rain on Window", "Mưa trên cửa sổ", "🪟", "/sounds/rain/rain-on-window.mp3"),
    sound!("thunder", Rain, "Thunder", "Sấm", "⛈️", "/sounds/rain/thunder.mp3"),
    sound!("white-noise", Noise, "White Noise", "Tiếng ồn trắng", "⬜", "/sounds/noise/white-noise.mp3"),
    sound!("brown-noise", Noise, "Brown Noise", "Tiếng ồn nâu", "🟫", "/sounds/noise/brown-noise.mp3"),
    sound!("pink-noise", Noise, "Pink Noise", "Tiếng ồn hồng", "🩷", "/sounds/noise/pink-noise.mp3"),
    sound!("library", Study, "Library", "Thư viện", "📚", "/sounds/study/library.mp3"),
    sound!("coffee-shop", Study, "Coffee Shop", "Quán cà phê", "☕", "/sounds/study/coffee-shop.mp3"),
    sound!("coworking", Study, "Coworking", "Không gian làm việc", "💻", "/sounds/study/coworking.mp3"),
    sound!("clock", Cozy, "Clock", "Đồng hồ", "🕐", "/sounds/cozy/clock.mp3"),
    sound!("singing-bowl", Cozy, "Singing Bowl", "Chén hát", "🔔", "/sounds/cozy/singing-bowl.mp3"),
    sound!("vinyl-effect", Cozy, "Vinyl Effect", "Đĩa than", "💿", "/sounds/cozy/vinyl-effect.mp3"),
    sound!("wind-chimes", Cozy, "Wind Chimes", "Chuông gió", "🎐", "/sounds/cozy/wind-chimes.mp3"),
    sound!("cat-purring", Cozy, "Cat Purring", "Mèo kêu", "🐱", "/sounds/cozy/cat-purring.mp3"),
    sound!("airplane", Transport, "Airplane", "Máy bay", "✈️", "/sounds/transport/airplane.mp3"),
    sound!("inside-a-train", Transport, "Inside a Train", "Trong tàu hỏa", "🚂", "/sounds/transport/inside-a-train.mp3"),
    sound!("submarine", Transport, "Submarine", "Tàu ngầm", "🚢", "/sounds/transport/submarine.mp3"),
    sound!("train", Transport, "Train", "Tàu hỏa", "🚆", "/sounds/transport/train.mp3"),
    sound!("busy-street", City, "Busy Street", "Đường đông", "🏙️", "/sounds/city/busy-street.mp3"),
    sound!("crowd", City, "Crowd", "Đám đông", "👥", "/sounds/city/crowd.mp3"),
    sound!("traffic", City, "Traffic", "Giao thông", "🚗", "/sounds/city/traffic.mp3"),
    sound!("ceiling-fan", Machine, "Ceiling Fan", "Quạt trần", "🌀", "/sounds/machine/ceiling-fan.mp3"),
    sound!("keyboard", Machine, "Keyboard", "Bàn phím", "⌨️", "/sounds/machine/keyboard.mp3"),
    sound!("typewriter", Machine, "Typewriter", "Máy viết chữ", "📝", "/sounds/machine/typewriter.mp3"),
];

static ALARMS: &[AlarmItem] = &[
    AlarmItem { id: "bell", label: "Bell", vn: "Chuông", url: "/sounds/alarms/bell.mp3" },
    AlarmItem { id: "chime", label: "Chime", vn: "Chuông nhẹ", url: "/sounds/alarms/chime.mp3" },
    AlarmItem { id: "gong", label: "Gong", vn: "Chuông đồng", url: "/sounds/alarms/gong.mp3" },
    AlarmItem { id: "digital", label: "Digital", vn: "Kỹ thuật số", url: "/sounds/alarms/digital.mp3" },
    AlarmItem { id: "soft", label: "Soft", vn: "Nhẹ nhàng", url: "/sounds/alarms/soft.mp3" },
];

pub const DEFAULT_ALARM: &str = "bell";

/// All ambient sounds in category display order.
pub fn all_sounds() -> &'static [SoundItem] {
    SOUNDS
}

pub fn find_sound(id: &str) -> Option<&'static SoundItem> {
    SOUNDS.iter().find(|sound| sound.id == id)
}

pub fn sounds_in(category: SoundCategory) -> impl Iterator<Item = &'static SoundItem> {
    SOUNDS.iter().filter(move |sound| sound.category == category)
}

/// Categories with their sounds, skipping empty ones.
pub fn grouped() -> Vec<(SoundCategory, Vec<&'static SoundItem>)> {
    SoundCategory::ALL
        .iter()
        .map(|category| (*category, sounds_in(*category).collect::<Vec<_>>()))
        .filter(|(_, sounds)| !sounds.is_empty())
        .collect()
}

pub fn alarm_sounds() -> &'static [AlarmItem] {
    ALARMS
}

/// Look up an alarm, falling back to the default bell for unknown ids.
pub fn find_alarm(id: &str) -> &'static AlarmItem {
    ALARMS
        .iter()
        .find(|alarm| alarm.id == id)
        .unwrap_or(&ALARMS[0])
}

/// Resolve a catalog locator against a sounds directory.
///
/// `/sounds/rain/thunder.mp3` under `assets` becomes `assets/rain/thunder.mp3`.
pub fn resolve_locator(sounds_dir: &Path, url: &str) -> PathBuf {
    let relative = url.trim_start_matches('/');
    let relative = relative.strip_prefix("sounds/").unwrap_or(relative);
    sounds_dir.join(relative)
}
