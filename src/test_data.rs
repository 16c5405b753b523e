pub const POST_DATA: &str = "---
title: Bonjour le monde
date: 2025-01-02 10:30:00
translation_id: hello
categories: [Rust, Web]
meta_keywords: ssg, rust
tags:
reading_time: 4
---
# Bonjour

Premier article du blog.

<!-- more -->

## La suite

Du contenu **important**.
";

pub const POST_NO_FRONTMATTER: &str = "# Sans métadonnées

Un article écrit sans bloc d'en-tête.
";

pub const SITE_CONFIG: &str = "title: Mon site
description: Un site bilingue
author: Thiago
languages: [fr, en]
default_lang: fr
posts_per_page: 5
";

pub const TRANSLATIONS: &str = "fr:
  blog_title: Le blog
  glossary_title: Glossaire
en:
  blog_title: The blog
  glossary_title: Glossary
";
