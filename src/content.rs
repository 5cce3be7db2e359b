// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Static page copy.
//!
//! Edit the text here to change what the About, How It Works and section
//! pages say. `{name}` placeholders in a paragraph become links to the URL
//! registered under `name`.

#[derive(Debug)]
pub struct PageTitle {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const BLOG_PAGE: PageTitle = PageTitle {
    title: "NIP-23s",
    subtitle: "Long-form content (i.e. articles, blog posts).",
};

pub const NOTES_PAGE: PageTitle = PageTitle {
    title: "NIP-01s",
    subtitle: "Short-form, tweet-like posts. I do not post, so chances are, this section will always be empty.",
};

pub const HOW_IT_WORKS_PAGE: PageTitle = PageTitle {
    title: "How this page works",
    subtitle: "",
};

pub const CV_PAGE: PageTitle = PageTitle {
    title: "Curriculum Vitae",
    subtitle: "Professional background and experience",
};

#[derive(Debug)]
pub struct Paragraph {
    pub text: &'static str,
    pub links: &'static [(&'static str, &'static str)],
}

pub const ABOUT_PARAGRAPHS: &[Paragraph] = &[
    Paragraph {
        text: "This is a Nostr client which only displays the long-form (NIP-23) and short-form (NIP-01) \
               content I've authored and published on Nostr. See {howItWorks} for an explanation of how \
               this page uses Nostr to fetch my writings, and why I chose to build it this way.",
        links: &[("howItWorks", "/how-it-works")],
    },
    Paragraph {
        text: "The views and opinions are mine, and not of any past, present, or future employer, family, or friend.",
        links: &[],
    },
];

pub const HOW_IT_WORKS_PARAGRAPHS: &[&str] = &[
    "All blog posts and other writings you will see here are published to a distributed collection of \
     relays using the Nostr protocol. Unlike centralized alternatives where writings can be tampered \
     with or deleted, Nostr guarantees that (1) all content under my \"name\" (public key) has been \
     signed by my private key which only I have access to, and (2) the content is hosted on \
     decentralized relays independently of this client, and can be read through any other Nostr \
     client which supports NIP-23 events.",
    "When you open this page, the client connects to multiple independent relays and requests all \
     content under my public key. In contrast to general-purpose clients, it only displays content \
     under my public key, essentially making this a personal blog where the content is not hosted \
     by me but by independent relays.",
];

pub const WHY_NOT_SELF_HOST_HEADING: &str = "Why not just host everything myself?";

pub const WHY_NOT_SELF_HOST_PARAGRAPHS: &[&str] = &[
    "I've always wanted a personal page where I could put my ideas, learnings, and thoughts into \
     writing. Publishing on Nostr means the work I put energy into also enriches a protocol I \
     support as a building block of the future internet.",
    "In addition to that, there are other perks:",
];

pub const WHY_NOT_SELF_HOST_BULLETS: &[&str] = &[
    "The writings live independently of this client. If it is not available, the writings still \
     are, through the many other Nostr clients, since they live on Nostr relays.",
    "All of the content shown here has been signed by my private key. Anyone can check my content \
     through other Nostr clients to confirm that.",
    "You can use any client which supports NIP-23 events to read these writings. The content under \
     my public key is the same irrespective of the front-end used to fetch it.",
];

pub const OTHER_CLIENT_LINK: &str = "https://primal.net/home";

/// A run of paragraph text, either plain or linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Link { label: &'a str, target: &'a str },
}

/// Split a paragraph into text and link segments.
///
/// Placeholders without a registered link are kept as literal text.
pub fn segments<'a>(text: &'a str, links: &'a [(&'a str, &'a str)]) -> Vec<Segment<'a>> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        let name = &rest[open + 1..close];

        match links.iter().find(|(key, _)| *key == name) {
            Some((label, target)) => {
                if open > 0 {
                    out.push(Segment::Text(&rest[..open]));
                }
                out.push(Segment::Link { label, target });
            }
            None => out.push(Segment::Text(&rest[..=close])),
        }
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        out.push(Segment::Text(rest));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_with_link() {
        let segs = segments("See {howItWorks} for more.", &[("howItWorks", "/how-it-works")]);
        assert_eq!(
            segs,
            vec![
                Segment::Text("See "),
                Segment::Link { label: "howItWorks", target: "/how-it-works" },
                Segment::Text(" for more."),
            ]
        );
    }

    #[test]
    fn test_unknown_placeholder_stays_text() {
        let segs = segments("a {missing} b", &[]);
        let joined: String = segs
            .iter()
            .map(|s| match s {
                Segment::Text(t) => *t,
                Segment::Link { label, .. } => label,
            })
            .collect();
        assert_eq!(joined, "a {missing} b");
    }

    #[test]
    fn test_about_copy_links_resolve() {
        for paragraph in ABOUT_PARAGRAPHS {
            for segment in segments(paragraph.text, paragraph.links) {
                if let Segment::Text(text) = segment {
                    assert!(!text.contains("{howItWorks}"));
                }
            }
        }
    }
}
