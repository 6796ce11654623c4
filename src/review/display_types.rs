//! App Store screenshot display types and their accepted pixel sizes.

/// One App Store display type and the portrait sizes it accepts.
#[derive(Debug, Clone, Copy)]
pub struct DisplayType {
    pub name: &'static str,
    /// Accepted sizes as `(width, height)`.
    pub sizes: &'static [(u32, u32)],
    /// Whether the rotated size of every entry is accepted too.
    pub rotatable: bool,
}

impl DisplayType {
    /// Every accepted `(width, height)`, rotated sizes included.
    pub fn dimensions(&self) -> Vec<(u32, u32)> {
        let mut dims = self.sizes.to_vec();
        if self.rotatable {
            dims.extend(self.sizes.iter().map(|(w, h)| (*h, *w)));
        }
        dims
    }

    pub fn accepts(&self, width: u32, height: u32) -> bool {
        self.sizes.iter().any(|&(w, h)| {
            (w, h) == (width, height) || (self.rotatable && (h, w) == (width, height))
        })
    }
}

const fn rotatable(name: &'static str, sizes: &'static [(u32, u32)]) -> DisplayType {
    DisplayType {
        name,
        sizes,
        rotatable: true,
    }
}

const fn fixed(name: &'static str, sizes: &'static [(u32, u32)]) -> DisplayType {
    DisplayType {
        name,
        sizes,
        rotatable: false,
    }
}

/// App Store Connect screenshot display types, app (`APP_*`) and iMessage.
pub const DISPLAY_TYPES: &[DisplayType] = &[
    rotatable("APP_IPHONE_69", &[(1320, 2868), (1290, 2796), (1260, 2736)]),
    rotatable("APP_IPHONE_67", &[(1290, 2796), (1284, 2778)]),
    rotatable("APP_IPHONE_65", &[(1242, 2688), (1284, 2778)]),
    rotatable("APP_IPHONE_63", &[(1206, 2622), (1179, 2556)]),
    rotatable("APP_IPHONE_61", &[(1179, 2556), (1170, 2532), (828, 1792)]),
    rotatable("APP_IPHONE_58", &[(1125, 2436), (1080, 2340)]),
    rotatable("APP_IPHONE_55", &[(1242, 2208)]),
    rotatable("APP_IPHONE_47", &[(750, 1334)]),
    rotatable("APP_IPHONE_40", &[(640, 1136), (640, 1096)]),
    rotatable("APP_IPHONE_35", &[(640, 960), (640, 920)]),
    rotatable("APP_IPAD_PRO_3GEN_129", &[(2064, 2752), (2048, 2732)]),
    rotatable("APP_IPAD_PRO_129", &[(2048, 2732)]),
    rotatable(
        "APP_IPAD_PRO_3GEN_11",
        &[(1668, 2420), (1668, 2388), (1640, 2360), (1488, 2266)],
    ),
    rotatable("APP_IPAD_105", &[(1668, 2224)]),
    rotatable("APP_IPAD_97", &[(1536, 2048), (768, 1024)]),
    fixed(
        "APP_DESKTOP",
        &[(1280, 800), (1440, 900), (2560, 1600), (2880, 1800)],
    ),
    fixed("APP_APPLE_TV", &[(1920, 1080), (3840, 2160)]),
    fixed("APP_APPLE_VISION_PRO", &[(3840, 2160)]),
    fixed("APP_WATCH_ULTRA", &[(422, 514), (410, 502)]),
    fixed("APP_WATCH_SERIES_10", &[(416, 496), (374, 446)]),
    fixed("APP_WATCH_SERIES_7", &[(396, 484)]),
    fixed("APP_WATCH_SERIES_4", &[(368, 448)]),
    fixed("APP_WATCH_SERIES_3", &[(312, 390)]),
    rotatable("IMESSAGE_APP_IPHONE_67", &[(1290, 2796), (1284, 2778)]),
    rotatable("IMESSAGE_APP_IPHONE_65", &[(1242, 2688), (1284, 2778)]),
    rotatable("IMESSAGE_APP_IPAD_PRO_129", &[(2048, 2732)]),
];

pub fn find_display_type(name: &str) -> Option<&'static DisplayType> {
    DISPLAY_TYPES.iter().find(|dt| dt.name == name)
}

/// Names of every `APP_*` display type accepting `width`x`height`, in table
/// order.
pub fn matching_app_display_types(width: u32, height: u32) -> Vec<String> {
    DISPLAY_TYPES
        .iter()
        .filter(|dt| dt.name.starts_with("APP_"))
        .filter(|dt| dt.accepts(width, height))
        .map(|dt| dt.name.to_string())
        .collect()
}
