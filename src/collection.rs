use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io;
use std::io::ErrorKind;

use spdlog::warn;

use crate::content::Post;
use crate::post_list::PostList;

pub struct PostCollection {
    posts: Vec<Post>,
    link_to_index: HashMap<String, usize>,
}

impl PostCollection {
    pub fn new() -> PostCollection {
        PostCollection {
            posts: Default::default(),
            link_to_index: Default::default(),
        }
    }

    /// Loads every post listed, skipping and logging the ones that do not parse.
    pub fn load(post_list: &PostList) -> io::Result<PostCollection> {
        let mut collection = PostCollection::new();
        for file in post_list.retrieve_files()? {
            match Post::from_file(&file) {
                Ok(post) => {
                    if let Err(e) = collection.add(post) {
                        warn!("{}", e);
                    }
                }
                Err(e) => warn!("Skipping post: {}", e),
            }
        }
        Ok(collection)
    }

    pub fn add(&mut self, post: Post) -> io::Result<()> {
        if let Some(idx) = self.link_to_index.get(&post.slug) {
            return Err(io::Error::new(
                ErrorKind::AlreadyExists,
                format!("Slug {} of {} is already used by {}",
                        post.slug, post.file_name.display(), self.posts[*idx].file_name.display()),
            ));
        }

        self.link_to_index.insert(post.slug.clone(), self.posts.len());
        self.posts.push(post);
        Ok(())
    }

    /// Newest first
    pub fn sort(&mut self) {
        self.posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
        self.link_to_index = self.posts.iter()
            .enumerate()
            .map(|(idx, post)| (post.slug.clone(), idx))
            .collect();
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn from_link(&self, link: &str) -> Option<&Post> {
        self.link_to_index.get(link).map(|idx| &self.posts[*idx])
    }

    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        Self::count_terms(self.posts.iter().flat_map(|p| p.tags.iter()))
    }

    pub fn category_counts(&self) -> Vec<(String, usize)> {
        Self::count_terms(self.posts.iter().flat_map(|p| p.categories.iter()))
    }

    // Sorted by frequency reversed, then by name
    fn count_terms<'a>(terms: impl Iterator<Item=&'a String>) -> Vec<(String, usize)> {
        let mut term_map: HashMap<&String, usize> = HashMap::new();
        for term in terms {
            *term_map.entry(term).or_insert(0) += 1;
        }

        let mut term_list: Vec<(String, usize)> = term_map.into_iter()
            .map(|(k, v)| (k.clone(), v))
            .collect();
        term_list.sort_by(|(ka, va), (kb, vb)| vb.cmp(va).then_with(|| ka.cmp(kb)));
        term_list
    }

    /// Groups of tags and categories that only differ by case or separators,
    /// e.g. `Performance` and `performance`, or `dot-net` and `dotnet`.
    pub fn similar_terms(&self) -> Vec<Vec<String>> {
        let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let terms = self.posts.iter()
            .flat_map(|p| p.tags.iter().chain(p.categories.iter()));
        for term in terms {
            groups.entry(normalize_term(term)).or_default().insert(term.clone());
        }

        groups.into_values()
            .filter(|group| group.len() > 1)
            .map(|group| group.into_iter().collect())
            .collect()
    }
}

fn normalize_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::text_utils::parse_date_time;

    use super::*;

    fn post(slug: &str, date: &str, tags: &[&str], categories: &[&str]) -> Post {
        Post {
            file_name: PathBuf::from(format!("_posts/{}-{}.md", &date[..10], slug)),
            slug: slug.to_string(),
            layout: Some("post".to_string()),
            title: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            categories: categories.iter().map(|t| t.to_string()).collect(),
            date: parse_date_time(date).unwrap(),
            body: "Body".to_string(),
            has_front_matter: true,
        }
    }

    #[test]
    fn test_happy_case() -> io::Result<()> {
        let mut collection = PostCollection::new();
        collection.add(post("net8-performance-optimisation", "2024-10-20", &["performance"], &["dotnet"]))?;
        collection.add(post("json-serializer-vs-json-convert", "2024-12-02", &["json", "parsing", "performance"], &["dotnet"]))?;
        collection.add(post("azure-costs", "2024-11-15", &["azure"], &["cloud"]))?;
        collection.sort();

        let slugs: Vec<&str> = collection.posts().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["json-serializer-vs-json-convert", "azure-costs", "net8-performance-optimisation"]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.from_link("azure-costs").unwrap().date.date().to_string(), "2024-11-15");
        assert!(collection.from_link("missing").is_none());

        // The slug index follows the sorted order
        let err = collection.add(post("azure-costs", "2024-11-16", &[], &[])).unwrap_err();
        assert!(err.to_string().contains("already used by _posts/2024-11-15-azure-costs.md"));

        let tags = collection.tag_counts();
        assert_eq!(tags[0], ("performance".to_string(), 2));
        assert_eq!(tags[1], ("azure".to_string(), 1));
        assert_eq!(collection.category_counts(), vec![("dotnet".to_string(), 2), ("cloud".to_string(), 1)]);
        Ok(())
    }

    #[test]
    fn test_load_posts_dir() -> io::Result<()> {
        let mut collection = PostCollection::load(&PostList { root_dir: PathBuf::from("res/posts") })?;
        collection.sort();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.posts()[0].slug, "json-serializer-vs-json-convert");
        assert!(collection.from_link("net8-performance-optimisation").unwrap().tags.is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicate_slug() {
        let mut collection = PostCollection::new();
        collection.add(post("same", "2024-10-20", &[], &[])).unwrap();
        let err = collection.add(post("same", "2024-10-21", &[], &[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_similar_terms() {
        let mut collection = PostCollection::new();
        collection.add(post("a", "2024-10-20", &["Performance", "dot-net"], &[])).unwrap();
        collection.add(post("b", "2024-10-21", &["performance", "json"], &["dotnet"])).unwrap();

        let similar = collection.similar_terms();
        assert_eq!(similar, vec![
            vec!["dot-net".to_string(), "dotnet".to_string()],
            vec!["Performance".to_string(), "performance".to_string()],
        ]);
    }
}
