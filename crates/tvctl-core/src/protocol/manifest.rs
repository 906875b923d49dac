//! The signed capability manifest sent with every registration attempt.
//!
//! The TV only accepts a registration if the manifest carries a signature it
//! recognises, so every value below is fixed.  The signature blob is opaque
//! to this client; it is forwarded verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Permissions declared inside the signed block.
const SIGNED_PERMISSIONS: &[&str] = &[
    "TEST_SECURE",
    "CONTROL_INPUT_TEXT",
    "CONTROL_MOUSE_AND_KEYBOARD",
    "READ_INSTALLED_APPS",
    "READ_LGE_SDX",
    "READ_NOTIFICATIONS",
    "SEARCH",
    "WRITE_SETTINGS",
    "WRITE_NOTIFICATION_ALERT",
    "CONTROL_POWER",
    "READ_CURRENT_CHANNEL",
    "READ_RUNNING_APPS",
    "READ_UPDATE_INFO",
    "UPDATE_FROM_REMOTE_APP",
    "READ_LGE_TV_INPUT_EVENTS",
    "READ_TV_CURRENT_TIME",
];

/// Permissions requested for this session.
const REQUESTED_PERMISSIONS: &[&str] = &[
    "LAUNCH",
    "LAUNCH_WEBAPP",
    "APP_TO_APP",
    "CLOSE",
    "TEST_OPEN",
    "TEST_PROTECTED",
    "CONTROL_AUDIO",
    "CONTROL_DISPLAY",
    "CONTROL_INPUT_JOYSTICK",
    "CONTROL_INPUT_MEDIA_RECORDING",
    "CONTROL_INPUT_MEDIA_PLAYBACK",
    "CONTROL_INPUT_TV",
    "CONTROL_POWER",
    "READ_APP_STATUS",
    "READ_CURRENT_CHANNEL",
    "READ_INPUT_DEVICE_LIST",
    "READ_NETWORK_STATE",
    "READ_RUNNING_APPS",
    "READ_TV_CHANNEL_LIST",
    "WRITE_NOTIFICATION_TOAST",
    "READ_POWER_STATE",
    "READ_COUNTRY_INFO",
    "READ_SETTINGS",
    "CONTROL_TV_SCREEN",
    "CONTROL_TV_STANBY",
    "CONTROL_FAVORITE_GROUP",
    "CONTROL_USER_INFO",
    "CHECK_BLUETOOTH_DEVICE",
    "CONTROL_BLUETOOTH",
    "CONTROL_TIMER_INFO",
    "STB_INTERNAL_CONNECTION",
    "CONTROL_RECORDING",
    "READ_RECORDING_STATE",
    "WRITE_RECORDING_LIST",
    "READ_RECORDING_LIST",
    "READ_RECORDING_SCHEDULE",
    "WRITE_RECORDING_SCHEDULE",
    "READ_STORAGE_DEVICE_LIST",
    "READ_TV_PROGRAM_INFO",
    "CONTROL_BOX_CHANNEL",
    "READ_TV_ACR_AUTH_TOKEN",
    "READ_TV_CONTENT_STATE",
    "READ_TV_CURRENT_TIME",
    "ADD_LAUNCHER_CHANNEL",
    "SET_CHANNEL_SKIP",
    "RELEASE_CHANNEL_SKIP",
    "CONTROL_CHANNEL_BLOCK",
    "DELETE_SELECT_CHANNEL",
    "CONTROL_CHANNEL_GROUP",
    "SCAN_TV_CHANNELS",
    "CONTROL_TV_POWER",
    "CONTROL_WOL",
];

const SIGNATURE: &str = "eyJhbGdvcml0aG0iOiJSU0EtU0hBMjU2Iiwia2V5SWQiOiJ0ZXN0LXNpZ25pbmctY2VydCIsInNpZ25hdHVyZVZlcnNpb24iOjF9.hrVRgjCwXVvE2OOSpDZ58hR+59aFNwYDyjQgKk3auukd7pcegmE2CzPCa0bJ0ZsRAcKkCTJrWo5iDzNhMBWRyaMOv5zWSrthlf7G128qvIlpMT0YNY+n/FaOHE73uLrS/g7swl3/qH/BGFG2Hu4RlL48eb3lLKqTt2xKHdCs6Cd4RMfJPYnzgvI4BNrFUKsjkcu+WD4OO2A27Pq1n50cMchmcaXadJhGrOqH5YmHdOCj5NSHzJYrsW0HPlpuAx/ECMeIZYDh6RMqaFM2DXzdKX9NmmyqzJ3o/0lkk/N97gfVRLW5hA29yeAwaCViZNCP8iC9aO0q9fQojoa7NQnAtw==";

/// Registration payload body: pairing mode plus the signed manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeManifest {
    /// `true` would make the TV prompt even when the token is valid.
    pub force_pairing: bool,
    /// Pairing UX the TV should use on first contact.
    pub pairing_type: String,
    pub manifest: Manifest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub manifest_version: u32,
    pub app_version: String,
    pub signed: SignedBlock,
    pub permissions: Vec<String>,
    pub signatures: Vec<Signature>,
}

/// The part of the manifest covered by the vendor signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedBlock {
    pub created: String,
    pub app_id: String,
    pub vendor_id: String,
    pub localized_app_names: BTreeMap<String, String>,
    pub localized_vendor_names: BTreeMap<String, String>,
    pub permissions: Vec<String>,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub signature_version: u32,
    pub signature: String,
}

impl HandshakeManifest {
    /// Returns the manifest this client registers with.
    pub fn standard() -> Self {
        let app_names = [
            ("", "LG Remote App"),
            ("ko-KR", "리모컨 앱"),
            ("zxx-XX", "ЛГ Rэмotэ AПП"),
        ];

        Self {
            force_pairing: false,
            pairing_type: "PROMPT".to_string(),
            manifest: Manifest {
                manifest_version: 1,
                app_version: "1.1".to_string(),
                signed: SignedBlock {
                    created: "20140509".to_string(),
                    app_id: "com.lge.test".to_string(),
                    vendor_id: "com.lge".to_string(),
                    localized_app_names: to_map(&app_names),
                    localized_vendor_names: to_map(&[("", "LG Electronics")]),
                    permissions: to_owned(SIGNED_PERMISSIONS),
                    serial: "2f930e2d2cfe083771f68e4fe7bb07".to_string(),
                },
                permissions: to_owned(REQUESTED_PERMISSIONS),
                signatures: vec![Signature {
                    signature_version: 1,
                    signature: SIGNATURE.to_string(),
                }],
            },
        }
    }
}

impl Default for HandshakeManifest {
    fn default() -> Self {
        Self::standard()
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
