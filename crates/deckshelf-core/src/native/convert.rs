//! Translation between catalog shortcuts and client records.

use super::runtime::RuntimeKind;
use super::shortcut::NativeShortcut;
use crate::catalog::{dedup_tags, AssetSlot, Shortcut};
use crate::identity;

/// Catalog id for a client record.
///
/// Records the client saved without an `appid` get the id derived from
/// their executable and name.
pub fn internal_id(native: &NativeShortcut) -> String {
    if native.app_id == 0 {
        identity::generate_id_string(RuntimeKind::unwrap(&native.exe), &native.app_name)
    } else {
        identity::format_id(native.app_id)
    }
}

/// Catalog form of a client record, merged over the existing catalog entry.
///
/// The client's values win on every field it stores. Metadata the client
/// cannot represent (description, platform, program, ROM path, the artwork
/// slots) is kept from `existing`. The client's icon becomes the icon source
/// only when the catalog has none of its own.
pub fn to_internal(native: &NativeShortcut, existing: Option<&Shortcut>) -> Shortcut {
    let mut shortcut = existing.cloned().unwrap_or_default();

    shortcut.id = internal_id(native);
    shortcut.name = native.app_name.clone();
    shortcut.executable = RuntimeKind::unwrap(&native.exe).to_string();
    shortcut.start_directory = native.start_dir.clone();
    shortcut.launch_options = native.launch_options.clone();
    shortcut.tags = dedup_tags(native.tags.iter().cloned());

    if shortcut.icon.source.trim().is_empty() && !native.icon.is_empty() {
        shortcut.icon = AssetSlot::from_source(native.icon.as_str());
    }

    shortcut
}

/// Client form of a catalog shortcut.
///
/// Client-owned flags and the shortcut path come from `existing`; the icon
/// is left for the caller to resolve into the client's artwork directory.
pub fn from_internal(
    shortcut: &Shortcut,
    runtime: RuntimeKind,
    existing: Option<&NativeShortcut>,
) -> NativeShortcut {
    let app_id = identity::parse_id(&shortcut.id)
        .unwrap_or_else(|| identity::generate_id(&shortcut.executable, &shortcut.name));

    let mut native = NativeShortcut {
        app_id,
        app_name: shortcut.name.clone(),
        start_dir: shortcut.start_directory.clone(),
        exe: runtime.wrap(&shortcut.executable),
        launch_options: shortcut.launch_options.clone(),
        tags: dedup_tags(shortcut.tags.iter().cloned()),
        ..Default::default()
    };

    if let Some(existing) = existing {
        native.copy_client_fields(existing);
        native.shortcut_path = existing.shortcut_path.clone();
        native.icon = existing.icon.clone();
    }

    native
}
