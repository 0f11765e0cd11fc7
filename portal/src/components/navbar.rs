/// Fixed set of navigation targets. Each variant owns the element id
/// its link renders with, which is also the key activation goes by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Home,
    LogHours,
    LosapHours,
    MemberSearch,
}

impl NavTarget {
    pub const ALL: [NavTarget; 4] = [
        NavTarget::Home,
        NavTarget::LogHours,
        NavTarget::LosapHours,
        NavTarget::MemberSearch,
    ];

    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Home => "nav-home",
            Self::LogHours => "nav-log-hours",
            Self::LosapHours => "nav-losap-hours",
            Self::MemberSearch => "nav-member-hour",
        }
    }

    pub const fn href(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::LogHours => "/log-hours",
            Self::LosapHours => "/losap-hours",
            Self::MemberSearch => "/member-hour",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::LogHours => "Log Hours",
            Self::LosapHours => "LOSAP Hours",
            Self::MemberSearch => "Member Search",
        }
    }
}

/// Which link carries the active marker class. At most one link is
/// ever marked; activating an id outside the fixed set leaves no link
/// marked at all.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NavbarState {
    active: Option<NavTarget>,
}

impl NavbarState {
    /// Replaces the active marker. The previous holder always loses it,
    /// whether or not the new id resolves to a target.
    pub fn set_active(&mut self, element_id: &str) {
        self.active = NavTarget::ALL
            .into_iter()
            .find(|t| t.element_id() == element_id);
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<nav>");
        for target in NavTarget::ALL {
            let class = if self.active == Some(target) {
                "nav-link active"
            } else {
                "nav-link"
            };
            out.push_str(&format!(
                "<a id=\"{}\" class=\"{class}\" href=\"{}\">{}</a>",
                target.element_id(),
                target.href(),
                target.label()
            ));
        }
        out.push_str("</nav>");
        out
    }
}
