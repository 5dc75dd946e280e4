use crate::catalog::{AudioCategory, AudioEntry};

/// The fixed tracks shipped with the app.
pub fn bundled_entries() -> Vec<AudioEntry> {
    vec![
        AudioEntry::bundled(
            "1",
            "绵绵细雨",
            AudioCategory::WhiteNoise,
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3",
        ),
        AudioEntry::bundled(
            "2",
            "海浪声",
            AudioCategory::WhiteNoise,
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3",
        ),
        AudioEntry::bundled(
            "3",
            "运转的风扇",
            AudioCategory::WhiteNoise,
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3",
        ),
        AudioEntry::bundled(
            "4",
            "小红帽",
            AudioCategory::Story,
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-4.mp3",
        ),
        AudioEntry::bundled(
            "5",
            "丑小鸭",
            AudioCategory::Story,
            "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-5.mp3",
        ),
    ]
}
