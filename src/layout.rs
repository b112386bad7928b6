use std::path::PathBuf;

/// A code location holding one of the resolution dimensions as an
/// instruction immediate.
#[derive(Debug, Clone, Copy)]
pub struct CodeSite {
    pub offset: usize,
    pub dimension: Dimension,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

/// Everything tied to one known build of the game. A new executable version
/// only needs a new `Layout`.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub exe_name: &'static str,
    pub exe_backup_name: &'static str,
    pub config_name: &'static str,
    pub config_backup_name: &'static str,

    pub original_width: u32,
    pub original_height: u32,
    pub target_width: u32,
    pub target_height: u32,
    pub window_mode: &'static str,

    /// Width entry of the resolution table; the height follows 4 bytes later.
    pub table_offset: usize,
    pub code_sites: &'static [CodeSite],

    pub width_key: &'static str,
    pub height_key: &'static str,
    pub mode_key: &'static str,
}

pub const HUNDRED_LINE: Layout = Layout {
    exe_name: "HUNDRED_LINE.exe",
    exe_backup_name: "HUNDRED_LINE.exe.backup",
    config_name: "userconfig.properties",
    config_backup_name: "userconfig.properties.backup",

    original_width: 3840,
    original_height: 2160,
    target_width: 5120,
    target_height: 2880,
    window_mode: "BorderlessWindowed",

    table_offset: 0xBDA4F0,
    code_sites: &[
        CodeSite {
            offset: 0x054DF7,
            dimension: Dimension::Width,
            description: "Width getter (mov eax, 3840)",
        },
        CodeSite {
            offset: 0x4B4305,
            dimension: Dimension::Width,
            description: "Resolution param width (mov edx, 3840)",
        },
        CodeSite {
            offset: 0x054D37,
            dimension: Dimension::Height,
            description: "Height getter (mov eax, 2160)",
        },
        CodeSite {
            offset: 0x4B430B,
            dimension: Dimension::Height,
            description: "Resolution param height (mov r8d, 2160)",
        },
    ],

    width_key: "App.Window.W",
    height_key: "App.Window.H",
    mode_key: "App.Window.Mode",
};

impl Layout {
    pub fn original(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.original_width,
            Dimension::Height => self.original_height,
        }
    }

    pub fn target(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.target_width,
            Dimension::Height => self.target_height,
        }
    }

    /// End of the resolution table region (width + height).
    pub fn table_end(&self) -> usize {
        self.table_offset + 8
    }
}

/// The directory holding the game files, with the backup paths derived
/// from a layout.
#[derive(Debug, Clone)]
pub struct GameDir<'a> {
    root: PathBuf,
    layout: &'a Layout,
}

impl<'a> GameDir<'a> {
    pub fn new(root: impl Into<PathBuf>, layout: &'a Layout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn layout(&self) -> &'a Layout {
        self.layout
    }

    pub fn exe(&self) -> PathBuf {
        self.root.join(self.layout.exe_name)
    }

    pub fn exe_backup(&self) -> PathBuf {
        self.root.join(self.layout.exe_backup_name)
    }

    pub fn config(&self) -> PathBuf {
        self.root.join(self.layout.config_name)
    }

    pub fn config_backup(&self) -> PathBuf {
        self.root.join(self.layout.config_backup_name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;

    /// A miniature layout so test images stay a few hundred bytes.
    pub(crate) const TINY: Layout = Layout {
        table_offset: 0x100,
        code_sites: &[
            CodeSite {
                offset: 0x10,
                dimension: Dimension::Width,
                description: "Width getter",
            },
            CodeSite {
                offset: 0x20,
                dimension: Dimension::Width,
                description: "Resolution param width",
            },
            CodeSite {
                offset: 0x30,
                dimension: Dimension::Height,
                description: "Height getter",
            },
            CodeSite {
                offset: 0x40,
                dimension: Dimension::Height,
                description: "Resolution param height",
            },
        ],
        ..HUNDRED_LINE
    };

    /// An image matching `TINY` exactly as the unpatched build would.
    pub(crate) fn pristine_image() -> Vec<u8> {
        let mut data: Vec<u8> = (0..0x120u32).map(|i| (i % 251) as u8).collect();
        let mut put = |offset: usize, value: u32| {
            data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        };
        put(TINY.table_offset, TINY.original_width);
        put(TINY.table_offset + 4, TINY.original_height);
        for site in TINY.code_sites {
            put(site.offset, TINY.original(site.dimension));
        }
        data
    }

    #[test]
    fn code_sites_stay_below_table() {
        for site in HUNDRED_LINE.code_sites {
            assert!(site.offset + 4 <= HUNDRED_LINE.table_offset);
        }
    }

    #[test]
    fn backups_live_beside_targets() {
        let dir = GameDir::new("/game", &HUNDRED_LINE);
        assert_eq!(dir.exe_backup(), Path::new("/game/HUNDRED_LINE.exe.backup"));
        assert_eq!(
            dir.config_backup(),
            Path::new("/game/userconfig.properties.backup")
        );
    }
}
