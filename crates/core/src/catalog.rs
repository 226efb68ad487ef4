//! Classification and lifecycle enums for catalog templates.
//!
//! Each enum is stored as `TEXT` in the database and serialized as the same
//! snake_case string on the wire. [`std::str::FromStr`] and
//! `TryFrom<String>` reject unknown values with [`CoreError::Validation`],
//! which lets the row model decode columns straight into the enum.

use crate::error::CoreError;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Return the stored string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $val => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        other,
                        [$($val),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_text_enum! {
    /// Moderation status controlling public visibility.
    TemplateStatus ("status") {
        /// Author-only work in progress, never listed.
        Draft = "draft",
        /// Awaiting review. Default on creation.
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_text_enum! {
    /// Design tool the template is built for.
    Platform ("platform") {
        Figma = "figma",
        Sketch = "sketch",
        AdobeXd = "adobe_xd",
        Photoshop = "photoshop",
        Illustrator = "illustrator",
        Framer = "framer",
        Webflow = "webflow",
        Canva = "canva",
        Other = "other",
    }
}

define_text_enum! {
    /// Kind of asset being sold.
    TemplateType ("template type") {
        UiKit = "ui_kit",
        Website = "website",
        MobileApp = "mobile_app",
        Dashboard = "dashboard",
        LandingPage = "landing_page",
        IconSet = "icon_set",
        Illustration = "illustration",
        Presentation = "presentation",
        Mockup = "mockup",
        Font = "font",
        Other = "other",
    }
}

define_text_enum! {
    AccessType ("access type") {
        Free = "free",
        Paid = "paid",
    }
}

define_text_enum! {
    LicenseType ("license type") {
        Regular = "regular",
        Extended = "extended",
    }
}

impl Default for TemplateStatus {
    fn default() -> Self {
        TemplateStatus::Pending
    }
}

impl Default for AccessType {
    fn default() -> Self {
        AccessType::Paid
    }
}

impl Default for LicenseType {
    fn default() -> Self {
        LicenseType::Regular
    }
}
