// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

fn patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .unwrap()
        })
        .collect()
}

static YOUTUBE: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"^https?://(www\.|m\.)?youtube\.com/(watch\?v=|embed/)[0-9a-zA-Z_-]+$",
        r"^https?://youtu\.be/[0-9a-zA-Z_-]+$",
        r"^https?://((m|www)\.)?youtube\.com/playlist\S+$",
    ])
});

static VIMEO: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"^https?://vimeo\.com/[0-9]+$",
        r"^https?://vimeo\.com/channels/[0-9a-zA-Z]+/[0-9]+$",
        r"^https://player\.vimeo\.com/video/[0-9]+$",
    ])
});

static TWITTER: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"^https?://(www\.)?twitter\.com/\w{1,15}/status(es)?/\S+$",
        r"^https?://(www\.)?twitter\.com/\w{1,15}$",
        r"^https?://(www\.)?twitter\.com/\w{1,15}/likes$",
        r"^https?://(www\.)?twitter\.com/\w{1,15}/lists/\S+$",
        r"^https?://(www\.)?twitter\.com/i/moments/\S+$",
    ])
});

static OTHERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    patterns(&[
        r"^https?://(www\.)?(flickr\.com|flic\.kr)/(photos|p|s)/\S+$",
        r"^https?://(www\.)?issuu\.com/.+/docs/\S+$",
        r"^https?://(www\.)?instagr(\.am|am\.com)/p/\S+$",
        r"^https?://www\.facebook\.com/.*/(posts|photos|videos)/\S+$",
        r"^https?://www\.facebook\.com/notes/\S+$",
    ])
});

/// Tells whether a URL points at content a site knows how to embed.
pub struct EmbedUrlProcessor<'a> {
    url: &'a str,
}

impl<'a> EmbedUrlProcessor<'a> {
    pub fn new(url: &'a str) -> Self {
        Self { url: url.trim() }
    }

    pub fn is_valid_embed(&self) -> bool {
        self.is_youtube_embed()
            || self.is_vimeo_embed()
            || self.is_twitter_embed()
            || self.matches(&OTHERS)
    }

    pub fn is_youtube_embed(&self) -> bool {
        self.matches(&YOUTUBE)
    }

    pub fn is_vimeo_embed(&self) -> bool {
        self.matches(&VIMEO)
    }

    pub fn is_twitter_embed(&self) -> bool {
        self.matches(&TWITTER)
    }

    fn matches(&self, regexes: &[Regex]) -> bool {
        regexes.iter().any(|regex| regex.is_match(self.url))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn recognizes_youtube() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/embed/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://m.youtube.com/playlist?list=PL1",
        ] {
            assert!(EmbedUrlProcessor::new(url).is_youtube_embed(), "{url}");
        }
        assert!(!EmbedUrlProcessor::new("https://youtube.com/about").is_youtube_embed());
    }

    #[test]
    fn recognizes_vimeo() {
        let processor = EmbedUrlProcessor::new("https://vimeo.com/channels/staffpicks/123");
        assert!(processor.is_vimeo_embed());
        assert!(EmbedUrlProcessor::new("https://player.vimeo.com/video/42").is_vimeo_embed());
        assert!(!EmbedUrlProcessor::new("https://vimeo.com/about").is_vimeo_embed());
    }

    #[test]
    fn other_providers_are_valid_embeds() {
        assert!(EmbedUrlProcessor::new("https://twitter.com/matrixdotorg/status/1").is_valid_embed());
        assert!(EmbedUrlProcessor::new("https://www.instagram.com/p/abc/").is_valid_embed());
        assert!(!EmbedUrlProcessor::new("https://example.com/p/abc").is_valid_embed());
    }
}
