//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> &'static str {
    r##"# Lumen Configuration
# Only override what you want to change -- missing fields use defaults.

[renderer]
# max_shapes_per_batch = 4000       # 1-100000, quads per draw call
# max_lines_per_batch = 2000        # 1-100000, lines per draw call
# max_texture_slots = 16            # 2-32, slot 0 holds the default texture
# texture_array_uniform = "u_Textures"
# virtual_width = 1280              # 1-16384
# virtual_height = 720              # 1-16384
# clear_color = "#000000"

[camera]
# half_size = 8.0                   # world units from centre to left/right edge

[logging]
level = "info"                      # trace, debug, info, warn, error
"##
}
