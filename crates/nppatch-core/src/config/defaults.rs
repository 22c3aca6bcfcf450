//! Default value functions used by serde for config deserialization.

pub fn default_log_level() -> String {
    "warn".to_string()
}

pub fn default_objects_dir() -> String {
    "force-app/main/default/objects".to_string()
}

pub fn default_permission_set_output() -> String {
    "force-app/main/default/permissionsets/NPPatch_Admin.permissionset-meta.xml".to_string()
}
