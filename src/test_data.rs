#[cfg(test)]
pub const POST_JSON_MD: &str = include_str!("../res/posts/2024-12-02-json-serializer-vs-json-convert.md");

#[cfg(test)]
pub const POST_NO_FRONT_MATTER_MD: &str = include_str!("../res/posts/2024-10-20-net8-performance-optimisation.md");

#[cfg(test)]
pub const CODE_BLOCKS_MD: &str = "Some text

```csharp
var options = new JsonSerializerOptions();
```

~~~~xml
<Project>
```
not a closing fence for tildes
</Project>
~~~~

```
dotnet build
```
";

#[cfg(test)]
pub const POST_BROKEN_MD: &str = "---
layout: post
title: Central package management
tags: nuget Performance
date: 2024-11-03
author: someone
---

Intro with an unclosed fence.

```xml
<PackageVersion Include=\"Serilog\" Version=\"4.0.0\" />
";

#[cfg(test)]
pub const PAGE_TEMPLATE: &str = r##"
TITLE=[{{{title}}}]
LAYOUT=[{{layout}}]
DATE=[{{date}}]
TAGS=[{{#tags}}({{tag}}){{/tags}}]
CATEGORIES=[{{#categories}}({{tag}}){{/categories}}]
READ=[{{read_time}}]
BODY=[{{{body}}}]
"##;
