use std::path::PathBuf;

use serde::Serialize;

use crate::routing::RouteInfo;

pub struct Paginator<'a, T> {
    item_list: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    /// An empty list still has one (empty) page.
    pub fn from(item_list: &'a [T], page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let item_count = item_list.len() as u32;
        let page_count = if item_count == 0 {
            1
        } else {
            ((item_count - 1) / page_size) + 1
        };

        Paginator {
            item_list,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        match page {
            0 => return Err("Page has to be greater than 0".to_string()),
            x if x > self.page_count => return Err(format!("Page has to be less than page_count ({})", self.page_count)),
            _ => {}
        };

        let index = ((page - 1) * self.page_size) as usize;
        let end = (index + self.page_size as usize).min(self.item_list.len());
        let index = index.min(end);
        Ok(&self.item_list[index..end])
    }

    /// Builds every page, asking `route` for the URL of page N.
    pub fn views<F>(&self, route: F) -> Vec<PaginatedView<'a, T>>
    where
        F: Fn(u32) -> RouteInfo,
    {
        let routes: Vec<RouteInfo> = (1..=self.page_count).map(route).collect();
        let page_links: Vec<PageLink> = routes.iter()
            .enumerate()
            .map(|(i, r)| PageLink {
                number: i as u32 + 1,
                url: r.url.clone(),
                current: false,
            })
            .collect();

        routes.iter()
            .enumerate()
            .map(|(i, r)| {
                let page_number = i as u32 + 1;
                let items = self.get_page(page_number).unwrap_or(&[]);
                let links = page_links.iter()
                    .map(|link| PageLink { current: link.number == page_number, ..link.clone() })
                    .collect();
                PaginatedView {
                    items,
                    page_number,
                    total_pages: self.page_count,
                    url: r.url.clone(),
                    output_path: r.output_path.clone(),
                    base_url: routes[0].url.clone(),
                    prev_url: if i > 0 { Some(routes[i - 1].url.clone()) } else { None },
                    next_url: routes.get(i + 1).map(|next| next.url.clone()),
                    page_links: links,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub url: String,
    pub current: bool,
}

/// One page of an ordered list, with everything a page selector needs.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedView<'a, T> {
    pub items: &'a [T],
    pub page_number: u32,
    pub total_pages: u32,
    pub url: String,
    #[serde(skip)]
    pub output_path: PathBuf,
    pub base_url: String,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub page_links: Vec<PageLink>,
}

pub fn paginate<T, F>(items: &[T], page_size: u32, route: F) -> Vec<PaginatedView<'_, T>>
where
    F: Fn(u32) -> RouteInfo,
{
    Paginator::from(items, page_size).views(route)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(page: u32) -> RouteInfo {
        let url = if page == 1 { "/blog/".to_string() } else { format!("/blog/page/{}/", page) };
        RouteInfo {
            output_path: PathBuf::from(format!("dist{}index.html", url)),
            url,
            is_index: page == 1,
        }
    }

    #[test]
    fn test_happy_case() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.get_page(1), Ok([1, 2, 3].as_slice()));
        assert_eq!(paginator.get_page(2), Ok([4, 5, 6].as_slice()));
        assert_eq!(paginator.get_page(5), Ok([13].as_slice()));

        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(6), Err("Page has to be less than page_count (5)".to_string()));
    }

    #[test]
    fn test_empty_has_one_page() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 1);
        assert_eq!(paginator.get_page(1), Ok([].as_slice()));

        let views = paginator.views(route);
        assert_eq!(views.len(), 1);
        assert!(views[0].items.is_empty());
        assert!(views[0].prev_url.is_none());
        assert!(views[0].next_url.is_none());
        assert_eq!(views[0].page_links.len(), 1);
    }

    #[test]
    fn test_twelve_posts_five_per_page() {
        let items: Vec<u32> = (1..=12).collect();
        let views = paginate(&items, 5, route);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].url, "/blog/");
        assert_eq!(views[1].prev_url.as_deref(), Some(views[0].url.as_str()));
        assert_eq!(views[1].next_url.as_deref(), Some("/blog/page/3/"));
        assert!(views[2].next_url.is_none());
        assert_eq!(views[2].items, &[11, 12]);
        assert_eq!(views[2].output_path, PathBuf::from("dist/blog/page/3/index.html"));
        for view in &views {
            assert_eq!(view.page_links.len(), 3);
            assert_eq!(view.total_pages, 3);
            assert_eq!(view.base_url, "/blog/");
            let current: Vec<u32> = view.page_links.iter().filter(|l| l.current).map(|l| l.number).collect();
            assert_eq!(current, [view.page_number]);
        }
    }

    #[test]
    fn test_pagination_completeness() {
        for n in 0..25usize {
            for page_size in 1..7u32 {
                let items: Vec<usize> = (0..n).collect();
                let views = paginate(&items, page_size, route);
                let expected_pages = std::cmp::max(1, (n as u32 + page_size - 1) / page_size);
                assert_eq!(views.len() as u32, expected_pages);
                let total: usize = views.iter().map(|v| v.items.len()).sum();
                assert_eq!(total, n);
                let flattened: Vec<usize> = views.iter().flat_map(|v| v.items.iter().copied()).collect();
                assert_eq!(flattened, items);
            }
        }
    }

    #[test]
    fn test_page_edge_linkage() {
        let items: Vec<u32> = (0..20).collect();
        let views = paginate(&items, 3, route);
        assert!(views[0].prev_url.is_none());
        assert!(views.last().unwrap().next_url.is_none());
        for i in 1..views.len() {
            assert_eq!(views[i].prev_url.as_deref(), Some(views[i - 1].url.as_str()));
            assert_eq!(views[i - 1].next_url.as_deref(), Some(views[i].url.as_str()));
        }
    }

    #[test]
    fn test_paginate_with_router() {
        use std::path::Path;

        use crate::config::parse_config;
        use crate::routing::UrlRouter;

        let config = parse_config("title: Site\nlanguages: [fr, en]\n", Path::new("site_config.yaml")).unwrap();
        let router = UrlRouter::new(&config, Path::new("dist"));
        let posts: Vec<u32> = (1..=12).collect();

        let views = paginate(&posts, 5, |page| router.route_list("blog", "fr", page));
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].url, "/fr/blog/");
        assert_eq!(views[0].output_path, PathBuf::from("dist/fr/blog/index.html"));
        assert_eq!(views[1].url, "/fr/blog/page/2/");
        assert_eq!(views[1].prev_url.as_deref(), Some("/fr/blog/"));
        assert_eq!(views[2].items, [11, 12]);
        assert_eq!(views[2].output_path, PathBuf::from("dist/fr/blog/page/3/index.html"));
        assert!(views.iter().all(|v| v.page_links.iter().all(|l| !l.url.contains("/page/1/"))));
    }
}
