// SPDX-License-Identifier: MIT
//
// Text attributes for painted fields.
//
// Colours are the art's business. Fields only add reverse video on top of
// whatever the art painted, to show which one owns focus.

bitflags::bitflags! {
    /// Field attributes stored as a compact bitfield.
    ///
    /// ```
    /// use af_term::attr::Attr;
    ///
    /// assert!(Attr::FOCUSED.contains(Attr::INVERSE));
    /// assert!(Attr::default().is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 7, swap foreground and background.
        const INVERSE = 1 << 0;
    }
}

impl Attr {
    /// Attributes used to highlight the field that owns focus.
    pub const FOCUSED: Self = Self::INVERSE;
}
