//! Like toggle button
//!
//! A two-state control that starts unliked. Each activation flips the
//! state; nothing is persisted, so every fresh instance (and every page
//! load) starts at "Like".

const BASE_CLASSES: &str =
    "like-button flex items-center gap-2 px-4 py-2 rounded-full transition-colors duration-200";
const LIKED_CLASSES: &str = "bg-red-500 text-white";
const NOT_LIKED_CLASSES: &str = "bg-gray-200 text-gray-700";

const LIKED_LABEL: &str = "Liked";
const NOT_LIKED_LABEL: &str = "Like";

/// Client-side toggle mirroring [`LikeButton::toggle`]; emitted once per page
pub const LIKE_BUTTON_SCRIPT: &str = r#"<script>
document.querySelectorAll('button[data-like-button]').forEach(function(button) {
    button.addEventListener('click', function() {
        var liked = button.getAttribute('aria-pressed') !== 'true';
        button.setAttribute('aria-pressed', liked ? 'true' : 'false');
        button.className = button.dataset.base + ' ' + (liked ? button.dataset.on : button.dataset.off);
        button.querySelector('[data-like-label]').textContent = liked ? 'Liked' : 'Like';
    });
});
</script>"#;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LikeButton {
    liked: bool,
}

impl LikeButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_liked(&self) -> bool {
        self.liked
    }

    /// Flip between liked and not liked
    pub fn toggle(&mut self) {
        self.liked = !self.liked;
    }

    pub fn label(&self) -> &'static str {
        if self.liked {
            LIKED_LABEL
        } else {
            NOT_LIKED_LABEL
        }
    }

    pub fn class_name(&self) -> String {
        let state = if self.liked {
            LIKED_CLASSES
        } else {
            NOT_LIKED_CLASSES
        };
        format!("{} {}", BASE_CLASSES, state)
    }

    /// Render the button; `children` is trusted HTML placed before the label
    pub fn render(&self, children: &str) -> String {
        format!(
            r#"<button type="button" data-like-button aria-pressed="{pressed}" class="{class}" data-base="{base}" data-on="{on}" data-off="{off}">{children}<span data-like-label>{label}</span></button>"#,
            pressed = self.liked,
            class = self.class_name(),
            base = BASE_CLASSES,
            on = LIKED_CLASSES,
            off = NOT_LIKED_CLASSES,
            children = children,
            label = self.label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unliked() {
        let button = LikeButton::new();
        assert!(!button.is_liked());
        assert_eq!(button.label(), "Like");
        assert!(button.class_name().contains("bg-gray-200 text-gray-700"));
    }

    #[test]
    fn test_toggle_cycle() {
        let mut button = LikeButton::new();

        button.toggle();
        assert!(button.is_liked());
        assert_eq!(button.label(), "Liked");
        assert!(button.class_name().contains("bg-red-500 text-white"));
        assert!(!button.class_name().contains("bg-gray-200"));

        button.toggle();
        assert!(!button.is_liked());
        assert_eq!(button.label(), "Like");
        assert!(button.class_name().contains("bg-gray-200 text-gray-700"));
    }

    #[test]
    fn test_fresh_instance_resets() {
        let mut first = LikeButton::new();
        first.toggle();
        assert_eq!(LikeButton::new().label(), "Like");
    }

    #[test]
    fn test_render_children_then_label() {
        let mut button = LikeButton::new();
        let html = button.render("<svg></svg>");
        assert!(html.starts_with("<button"));
        assert!(html.contains(r#"aria-pressed="false""#));
        assert!(html.contains("<svg></svg><span data-like-label>Like</span></button>"));

        button.toggle();
        let html = button.render("");
        assert!(html.contains(r#"aria-pressed="true""#));
        assert!(html.contains(">Liked</span>"));
    }
}
