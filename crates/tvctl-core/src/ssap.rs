//! `ssap://` URIs addressed by the command façade.

// System
pub const GET_SYSTEM_INFO: &str = "ssap://system/getSystemInfo";
pub const TURN_OFF: &str = "ssap://system/turnOff";

// Audio
pub const GET_VOLUME: &str = "ssap://audio/getVolume";
pub const SET_VOLUME: &str = "ssap://audio/setVolume";
pub const VOLUME_UP: &str = "ssap://audio/volumeUp";
pub const VOLUME_DOWN: &str = "ssap://audio/volumeDown";
pub const GET_MUTE: &str = "ssap://audio/getStatus";
pub const SET_MUTE: &str = "ssap://audio/setMute";

// TV input
pub const GET_INPUT_LIST: &str = "ssap://tv/getExternalInputList";
pub const SWITCH_INPUT: &str = "ssap://tv/switchInput";

// Apps
pub const GET_APPS: &str = "ssap://com.webos.applicationManager/listApps";
pub const LAUNCH_APP: &str = "ssap://system.launcher/launch";
pub const GET_FOREGROUND_APP: &str = "ssap://com.webos.applicationManager/getForegroundAppInfo";
pub const CLOSE_APP: &str = "ssap://system.launcher/close";

// Media
pub const PLAY: &str = "ssap://media.controls/play";
pub const PAUSE: &str = "ssap://media.controls/pause";
pub const STOP: &str = "ssap://media.controls/stop";
pub const REWIND: &str = "ssap://media.controls/rewind";
pub const FAST_FORWARD: &str = "ssap://media.controls/fastForward";

// Channels
pub const CHANNEL_UP: &str = "ssap://tv/channelUp";
pub const CHANNEL_DOWN: &str = "ssap://tv/channelDown";
pub const GET_CHANNEL_LIST: &str = "ssap://tv/getChannelList";
pub const GET_CURRENT_CHANNEL: &str = "ssap://tv/getCurrentChannel";

// Pointer socket lookup
pub const GET_POINTER_SOCKET: &str = "ssap://com.webos.service.networkinput/getPointerInputSocket";

// Text input (IME)
pub const INSERT_TEXT: &str = "ssap://com.webos.service.ime/insertText";
pub const DELETE_CHARACTERS: &str = "ssap://com.webos.service.ime/deleteCharacters";

// Notifications
pub const CREATE_TOAST: &str = "ssap://system.notifications/createToast";
