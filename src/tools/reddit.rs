//! Reddit analytics tool registry.
//!
//! The data-gathering and sentiment algorithms live behind [`RedditApi`];
//! this module only defines the invocation protocol: names, schemas, and
//! argument defaults for each registered tool.

use std::sync::Arc;

use async_trait::async_trait;

use super::tool::{FnTool, Tool};
use super::types::ToolParameters;
use crate::error::Result;

/// Options for raw post search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: i64,
    pub sort: String,
    pub time: String,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 50,
            sort: "relevance".into(),
            time: "all".into(),
        }
    }
}

/// Options for engagement-opportunity scanning.
#[derive(Debug, Clone)]
pub struct EngagementOptions {
    pub max_age_hours: i64,
    pub max_comments: i64,
    pub limit: i64,
}

impl Default for EngagementOptions {
    fn default() -> Self {
        Self {
            max_age_hours: 48,
            max_comments: 3,
            limit: 15,
        }
    }
}

/// External collaborator that fetches and summarizes Reddit data.
///
/// Each method returns whatever JSON shape that analysis defines; the engine
/// passes results through without interpreting them.
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// One-shot summary of sentiment, insights, and emotions for a keyword.
    async fn quick_pulse(&self, keyword: &str) -> Result<serde_json::Value>;

    /// Day-by-day sentiment trend over the given number of past days.
    async fn trendline(&self, keyword: &str, days: i64) -> Result<serde_json::Value>;

    /// Side-by-side sentiment comparison of multiple brands.
    async fn compare_brands(&self, keywords: &[String]) -> Result<serde_json::Value>;

    /// Top users frequently posting about a keyword.
    async fn influencers(&self, keyword: &str, limit: i64) -> Result<serde_json::Value>;

    /// Most active subreddits discussing a topic.
    async fn active_subreddits(&self, keyword: &str, limit: i64) -> Result<serde_json::Value>;

    /// Recent posts with high visibility and low engagement.
    async fn engagement_opportunities(
        &self,
        keyword: &str,
        options: EngagementOptions,
    ) -> Result<serde_json::Value>;

    /// Underserved questions, requests, and problems around a topic.
    async fn content_gaps(&self, keyword: &str) -> Result<serde_json::Value>;

    /// Raw post search.
    async fn search_posts(
        &self,
        keyword: &str,
        options: SearchOptions,
    ) -> Result<serde_json::Value>;

    /// Comments for one post.
    async fn fetch_comments(&self, post_id: &str, limit: i64) -> Result<serde_json::Value>;
}

/// Build the full tool registry over a Reddit API collaborator.
pub fn registry(api: Arc<dyn RedditApi>) -> Vec<Arc<dyn Tool>> {
    vec![
        quick_pulse_tool(api.clone()),
        trendline_tool(api.clone()),
        compare_brands_tool(api.clone()),
        influencers_tool(api.clone()),
        active_subreddits_tool(api.clone()),
        engagement_opportunities_tool(api.clone()),
        content_gaps_tool(api.clone()),
        search_posts_tool(api.clone()),
        fetch_comments_tool(api),
    ]
}

fn quick_pulse_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getQuickPulse",
        "Get a one-shot summary of Reddit sentiment, user insights, and emotions for a given keyword.",
        ToolParameters::object()
            .string("keyword", "Topic or brand to analyze on Reddit", true)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                api.quick_pulse(&keyword).await
            }
        },
    ))
}

fn trendline_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getTrendline",
        "Get a day-by-day sentiment trend over time for a Reddit topic.",
        ToolParameters::object()
            .string("keyword", "Topic or brand to analyze", true)
            .integer("days", "Number of past days to include (default: 30)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                let days = args.get_i64_or("days", 30);
                api.trendline(&keyword, days).await
            }
        },
    ))
}

fn compare_brands_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "compareBrands",
        "Compare multiple brands or topics based on Reddit sentiment and insights.",
        ToolParameters::object()
            .string_array("keywords", "List of brands or keywords to compare", true)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keywords = args.get_str_vec("keywords")?;
                api.compare_brands(&keywords).await
            }
        },
    ))
}

fn influencers_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getInfluencers",
        "Identify top Reddit users frequently posting about a keyword.",
        ToolParameters::object()
            .string("keyword", "Topic or brand to search", true)
            .integer("limit", "Number of top users to return (default: 10)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                let limit = args.get_i64_or("limit", 10);
                api.influencers(&keyword, limit).await
            }
        },
    ))
}

fn active_subreddits_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getActiveSubreddits",
        "Find the most active subreddits discussing a given topic.",
        ToolParameters::object()
            .string("keyword", "Topic or keyword to check for subreddit activity", true)
            .integer("limit", "Number of subreddits to return (default: 10)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                let limit = args.get_i64_or("limit", 10);
                api.active_subreddits(&keyword, limit).await
            }
        },
    ))
}

fn engagement_opportunities_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getEngagementOpportunities",
        "Find recent Reddit posts with high visibility and low engagement.",
        ToolParameters::object()
            .string("keyword", "Topic or keyword to find engagement opportunities", true)
            .integer("maxAgeHours", "Max age of posts in hours (default: 48)", false)
            .integer("maxComments", "Max number of comments (default: 3)", false)
            .integer("limit", "Number of posts to return (default: 15)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                let options = EngagementOptions {
                    max_age_hours: args.get_i64_or("maxAgeHours", 48),
                    max_comments: args.get_i64_or("maxComments", 3),
                    limit: args.get_i64_or("limit", 15),
                };
                api.engagement_opportunities(&keyword, options).await
            }
        },
    ))
}

fn content_gaps_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "getContentGaps",
        "Find Reddit questions, requests, or problems that are currently underserved.",
        ToolParameters::object()
            .string("keyword", "Topic or product to analyze for gaps or unmet needs", true)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                api.content_gaps(&keyword).await
            }
        },
    ))
}

fn search_posts_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "searchPosts",
        "Search Reddit posts for a keyword.",
        ToolParameters::object()
            .string("keyword", "Topic or keyword to search", true)
            .integer("limit", "Number of posts to return (default: 50)", false)
            .string("sort", "Sort order (default: relevance)", false)
            .string("time", "Time window (default: all)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let keyword = args.get_str("keyword")?.to_string();
                let options = SearchOptions {
                    limit: args.get_i64_or("limit", 50),
                    sort: args.get_str_or("sort", "relevance").to_string(),
                    time: args.get_str_or("time", "all").to_string(),
                };
                api.search_posts(&keyword, options).await
            }
        },
    ))
}

fn fetch_comments_tool(api: Arc<dyn RedditApi>) -> Arc<dyn Tool> {
    Arc::new(FnTool::new(
        "fetchComments",
        "Fetch comments for a Reddit post.",
        ToolParameters::object()
            .string("postId", "Post identifier", true)
            .integer("limit", "Number of comments to return (default: 100)", false)
            .build(),
        move |args| {
            let api = api.clone();
            async move {
                let post_id = args.get_str("postId")?.to_string();
                let limit = args.get_i64_or("limit", 100);
                api.fetch_comments(&post_id, limit).await
            }
        },
    ))
}
