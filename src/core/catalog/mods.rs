use std::collections::HashSet;

use super::model::{Category, ModDescriptor};
use crate::core::error::{SiteError, SiteResult};

use Category::{Core, Optimization, Utility, Visuals};

/// Mods offered on the mods page.
pub static MODS: &[ModDescriptor] = &[
    // ── Core libraries ──────────────────────────────────
    ModDescriptor::new("fabric_api", "Fabric API", "fabric-api", Core).mark_required(),
    ModDescriptor::new("modmenu", "Mod Menu", "modmenu", Core).with_deps(&["fabric_api"]),
    ModDescriptor::new("cloth_config", "Cloth Config API", "cloth-config", Core)
        .with_deps(&["fabric_api"])
        .with_description("Config library many mods depend on."),
    ModDescriptor::new(
        "fabric_language_kotlin",
        "Fabric Language Kotlin",
        "fabric-language-kotlin",
        Core,
    )
    .with_deps(&["fabric_api"])
    .with_description("Runtime for mods written in Kotlin (e.g. Inventory Profiles)."),
    ModDescriptor::new("indium", "Indium", "indium", Core)
        .with_deps(&["sodium", "fabric_api"])
        .with_description(
            "Sodium addon providing compatibility with rendering mods such as Connected Textures.",
        ),
    ModDescriptor::new(
        "reese_sodium_options",
        "Reese's Sodium Options",
        "reeses-sodium-options",
        Core,
    )
    .with_deps(&["sodium"])
    .with_description("Better options screen for Sodium."),
    ModDescriptor::new("yet_another_config_lib", "YetAnotherConfigLib", "yacl", Core)
        .with_deps(&["fabric_api"])
        .with_description("Config library (needed by Zoomify and others)."),
    ModDescriptor::new("malilib", "MaLiLib", "malilib", Core)
        .with_deps(&["fabric_api"])
        .with_description("Library required by Litematica."),
    // ── Optimization ────────────────────────────────────
    ModDescriptor::new("sodium", "Sodium", "sodium", Optimization)
        .with_deps(&["fabric_api"])
        .with_description("Powerful rendering engine. More FPS."),
    ModDescriptor::new("lithium", "Lithium", "lithium", Optimization)
        .with_deps(&["fabric_api"])
        .with_description("Optimizes game logic and physics."),
    ModDescriptor::new("ferritecore", "FerriteCore", "ferrite-core", Optimization)
        .with_deps(&["fabric_api"])
        .with_description("Reduces memory (RAM) usage."),
    ModDescriptor::new("immediatelyfast", "ImmediatelyFast", "immediatelyfast", Optimization)
        .with_deps(&["fabric_api"])
        .with_description("Speeds up GUI, map and entity rendering."),
    ModDescriptor::new("c2me", "C2ME", "c2me-fabric", Optimization)
        .with_deps(&["fabric_api"])
        .with_description("Faster chunk generation and loading."),
    ModDescriptor::new("voxy", "Voxy", "voxy", Optimization)
        .with_deps(&["sodium", "fabric_api"])
        .with_description("LOD rendering for huge view distances. Needs a strong PC."),
    // ── Visuals ─────────────────────────────────────────
    ModDescriptor::new("iris", "Iris Shaders", "iris", Visuals)
        .with_deps(&["sodium", "fabric_api"])
        .with_description("Shader support."),
    ModDescriptor::new("sodium_extra", "Sodium Extra", "sodium-extra", Visuals)
        .with_deps(&["sodium", "fabric_api", "reese_sodium_options"])
        .with_description("Extra graphics settings for Sodium."),
    ModDescriptor::new("zoomify", "Zoomify", "zoomify", Visuals)
        .with_deps(&["fabric_api", "yet_another_config_lib"])
        .with_description("Unlimited zoom with the mouse wheel."),
    ModDescriptor::new("lamb_dynamic_lights", "LambDynamicLights", "lambdynamiclights", Visuals)
        .with_deps(&["fabric_api"])
        .with_description("Dynamic lighting (a torch in hand lights up the area)."),
    ModDescriptor::new("continuity", "Continuity", "continuity", Visuals)
        .with_deps(&["fabric_api", "indium"])
        .with_description("Connected glass textures."),
    ModDescriptor::new("puzzle", "Puzzle", "puzzle", Visuals)
        .with_deps(&["fabric_api"])
        .with_description("Texture and model fixes for resource packs."),
    ModDescriptor::new(
        "not_enough_animations",
        "Not Enough Animations",
        "not-enough-animations",
        Visuals,
    )
    .with_deps(&["fabric_api"])
    .with_description("Adds missing third-person animations (eating, maps, boats)."),
    ModDescriptor::new("emotecraft", "Emotecraft", "emotecraft", Visuals)
        .with_deps(&["fabric_api"])
        .with_description("Player emotes and animations."),
    // ── Utility ─────────────────────────────────────────
    ModDescriptor::new("voicechat", "Simple Voice Chat", "simple-voice-chat", Utility)
        .with_deps(&["fabric_api"])
        .with_description("In-game voice chat."),
    ModDescriptor::new("xaeros_map", "Xaero's World Map", "xaeros-world-map", Utility)
        .with_deps(&["fabric_api"])
        .with_description("Full-screen world map."),
    ModDescriptor::new("xaeros_minimap", "Xaero's Minimap", "xaeros-minimap", Utility)
        .with_deps(&["fabric_api"])
        .with_description("Minimap."),
    ModDescriptor::new("appleskin", "AppleSkin", "appleskin", Utility)
        .with_deps(&["fabric_api"])
        .with_description("Shows food saturation and exhaustion."),
    ModDescriptor::new("chat_heads", "Chat Heads", "chat-heads", Utility)
        .with_deps(&["fabric_api"])
        .with_description("Shows player heads in chat."),
    ModDescriptor::new("shulkerboxtooltip", "Shulker Box Tooltip", "shulkerboxtooltip", Utility)
        .with_deps(&["fabric_api"])
        .with_description("Preview shulker box contents in the inventory."),
    ModDescriptor::new("litematica", "Litematica", "litematica", Utility)
        .with_deps(&["malilib", "fabric_api"])
        .with_description("Schematics for building: shows projections of structures."),
    ModDescriptor::new(
        "inventory_profiles_next",
        "Inventory Profiles Next",
        "inventory-profiles-next",
        Utility,
    )
    .with_deps(&["fabric_api", "fabric_language_kotlin"])
    .with_description("Inventory sorting and quick tool swapping."),
];

/// Check that ids are unique and every dependency names a configured mod.
pub fn validate_catalog(mods: &[ModDescriptor]) -> SiteResult<()> {
    let mut ids = HashSet::with_capacity(mods.len());
    for descriptor in mods {
        if !ids.insert(descriptor.id) {
            return Err(SiteError::Catalog(format!(
                "duplicate mod id '{}'",
                descriptor.id
            )));
        }
    }

    for descriptor in mods {
        if let Some(missing) = descriptor.deps.iter().find(|dep| !ids.contains(*dep)) {
            return Err(SiteError::Catalog(format!(
                "mod '{}' depends on unknown mod '{}'",
                descriptor.id, missing
            )));
        }
    }

    Ok(())
}
