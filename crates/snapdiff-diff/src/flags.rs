//! Comparison option and result bitsets.

use bitflags::bitflags;

bitflags! {
    /// What to compare beyond tree structure.
    ///
    /// Structure (added, removed, replaced) is always compared; each flag
    /// opts one attribute family in. Any subset, including none, is legal.
    /// `CONTENT` is the only option that reads stream bytes again, which
    /// makes it the expensive opt-in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ComparisonOptions: u32 {
        /// Compare uid, gid and permission bits.
        const OWNERSHIP = 1 << 0;
        /// Compare stream sizes and timestamps.
        const PROPERTIES = 1 << 1;
        /// Compare stream bytes.
        const CONTENT = 1 << 2;
    }
}

bitflags! {
    /// Classified difference for one tree position.
    ///
    /// Modification flags occupy the low half-word, structural flags the
    /// high one; one emitted entry carries the OR of everything that fired
    /// for its pair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ChangeFlags: u32 {
        /// Permission bits differ.
        const MODIFIED_PERMISSIONS = 1 << 0;
        /// Owner group id differs.
        const MODIFIED_GROUP_ID = 1 << 1;
        /// Owner user id differs.
        const MODIFIED_USER_ID = 1 << 2;
        /// Primary or alternate stream length differs.
        const MODIFIED_FILE_SIZE = 1 << 3;
        /// Creation or modification time differs.
        const MODIFIED_FILE_DATE = 1 << 4;
        /// Primary stream bytes differ.
        const MODIFIED_DATA_CONTENT = 1 << 5;
        /// Alternate stream bytes differ.
        const MODIFIED_RESOURCE_CONTENT = 1 << 6;

        /// Present only on the left side; the whole subtree is gone.
        const REMOVED = 1 << 16;
        /// Present only on the right side.
        const ADDED = 1 << 17;
        /// Present on both sides with different kinds.
        const REPLACED = 1 << 18;
    }
}

impl ChangeFlags {
    /// Mask covering every attribute-level modification flag.
    pub const MODIFIED_MASK: ChangeFlags = ChangeFlags::from_bits_truncate(0xFFFF);

    /// Whether any attribute-level modification flag is set.
    pub fn is_modification(&self) -> bool {
        self.intersects(Self::MODIFIED_MASK)
    }

    /// Whether a structural flag is set.
    pub fn is_structural(&self) -> bool {
        self.intersects(Self::REMOVED.union(Self::ADDED).union(Self::REPLACED))
    }

    /// Names of the set flags, for display.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}
