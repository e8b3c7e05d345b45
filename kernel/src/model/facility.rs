use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// 観光地の設備タグ。DB と JSON のどちらにも kebab-case で保存する。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Facility {
    Parking,
    Toilet,
    PrayerRoom,
    Restaurant,
    Wifi,
    WheelchairAccess,
    Playground,
    Lodging,
}
