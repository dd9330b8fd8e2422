/// Built-in interview scripts as `(id, toml)` pairs.
pub const BUILTIN_SCRIPTS: &[(&str, &str)] = &[
    (
        "character_development",
        include_str!("../scripts/character_development.toml"),
    ),
    ("dialogue", include_str!("../scripts/dialogue.toml")),
    ("editing", include_str!("../scripts/editing.toml")),
    ("location", include_str!("../scripts/location.toml")),
    ("research", include_str!("../scripts/research.toml")),
    ("scene", include_str!("../scripts/scene.toml")),
    ("style", include_str!("../scripts/style.toml")),
    ("worldbuilding", include_str!("../scripts/worldbuilding.toml")),
];
