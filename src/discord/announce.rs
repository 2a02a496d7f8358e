//! The "server hosted" announcement embed.

use serenity::builder::{CreateEmbed, CreateEmbedFooter};

use crate::config::types::AnnouncementConfig;

pub const LINK_FIELD: &str = "Private Server Link";
pub const HOST_FIELD: &str = "Hosted By";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-independent description of the broadcast embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub thumbnail_url: String,
    pub fields: Vec<EmbedField>,
    pub footer_text: String,
    pub footer_icon_url: String,
}

impl Announcement {
    /// Build the announcement for a hosted server.
    ///
    /// `caller_tag` is attributed in the footer; missing icons fall back to
    /// the configured placeholders.
    pub fn hosted(
        config: &AnnouncementConfig,
        link: &str,
        hosted_by: &str,
        caller_tag: &str,
        caller_avatar_url: Option<&str>,
        guild_icon_url: Option<&str>,
    ) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            colour: config.colour,
            thumbnail_url: guild_icon_url
                .unwrap_or(&config.fallback_thumbnail_url)
                .to_string(),
            fields: vec![
                EmbedField {
                    name: LINK_FIELD.to_string(),
                    value: link.to_string(),
                    inline: false,
                },
                EmbedField {
                    name: HOST_FIELD.to_string(),
                    value: hosted_by.to_string(),
                    inline: false,
                },
            ],
            footer_text: format!("Hosted by {}", caller_tag),
            footer_icon_url: caller_avatar_url
                .unwrap_or(&config.fallback_avatar_url)
                .to_string(),
        }
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let footer = CreateEmbedFooter::new(&self.footer_text).icon_url(&self.footer_icon_url);

        CreateEmbed::new()
            .title(&self.title)
            .description(&self.description)
            .colour(self.colour)
            .thumbnail(&self.thumbnail_url)
            .fields(
                self.fields
                    .iter()
                    .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
            )
            .footer(footer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosted_uses_caller_and_guild_images() {
        let config = AnnouncementConfig::default();
        let announcement = Announcement::hosted(
            &config,
            "https://example.com/share?code=abc",
            "alice",
            "bob",
            Some("https://cdn.example.com/avatar.png"),
            Some("https://cdn.example.com/icon.png"),
        );

        assert_eq!(announcement.title, config.title);
        assert_eq!(announcement.colour, 0x9B59B6);
        assert_eq!(announcement.thumbnail_url, "https://cdn.example.com/icon.png");
        assert_eq!(
            announcement.field(LINK_FIELD),
            Some("https://example.com/share?code=abc")
        );
        assert_eq!(announcement.field(HOST_FIELD), Some("alice"));
        assert_eq!(announcement.footer_text, "Hosted by bob");
        assert_eq!(announcement.footer_icon_url, "https://cdn.example.com/avatar.png");
        assert!(announcement.fields.iter().all(|field| !field.inline));
    }

    #[test]
    fn test_hosted_falls_back_to_placeholders() {
        let config = AnnouncementConfig::default();
        let announcement = Announcement::hosted(&config, "link", "alice", "bob", None, None);

        assert_eq!(announcement.thumbnail_url, config.fallback_thumbnail_url);
        assert_eq!(announcement.footer_icon_url, config.fallback_avatar_url);
    }
}
