use hotpuppy_core::ImageRecord;

pub const LAYOUT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="stylesheet" href="/static/style.css">
</head>
<body>
  <header>
    <h1><a href="/">HotPuppy</a></h1>
    <nav><a href="/">Current</a> | <a href="/archive">Archive</a></nav>
  </header>
  <main>
"#;

pub const LAYOUT_FOOT: &str = r#"  </main>
</body>
</html>
"#;

pub const WELCOME_BANNER: &str = r#"    <section class="welcome">
      <p>Welcome! Every visitor nudges this puppy a little. Describe a change and watch it evolve.</p>
    </section>
"#;

pub const EVOLVE_FORM: &str = r#"    <form id="evolve-form" method="post" action="/evolve">
      <input type="text" name="user_input" placeholder="Add something... (e.g. a space helmet)" required>
      <button type="submit">Evolve</button>
    </form>
    <p id="evolve-status"></p>
    <script>
      document.getElementById("evolve-form").addEventListener("submit", async (ev) => {
        ev.preventDefault();
        const status = document.getElementById("evolve-status");
        status.textContent = "Evolving...";
        const resp = await fetch("/evolve", { method: "POST", body: new URLSearchParams(new FormData(ev.target)) });
        const data = await resp.json();
        if (data.success) {
          document.getElementById("current-image").src = data.image_url;
          status.textContent = data.fallback ? "Evolved (placeholder image)" : "Evolved!";
          ev.target.reset();
        } else {
          status.textContent = data.error;
        }
      });
    </script>
"#;

fn layout(title: &str, body: &str) -> String {
    let mut html = LAYOUT_HEAD.replace("{title}", &escape_html(title));
    html.push_str(body);
    html.push_str(LAYOUT_FOOT);
    html
}

pub fn render_index(current: Option<&ImageRecord>, total: u64, first_visit: bool) -> String {
    let mut body = String::new();
    if first_visit {
        body.push_str(WELCOME_BANNER);
    }

    match current {
        Some(img) => {
            body.push_str(&format!(
                "    <figure>\n      <img id=\"current-image\" src=\"{}\" alt=\"Current HotPuppy\">\n      <figcaption>{}</figcaption>\n    </figure>\n",
                escape_html(&img.image_url),
                caption(img)
            ));
            body.push_str(EVOLVE_FORM);
        }
        None => body.push_str("    <p class=\"empty\">The first puppy is still being drawn. Check back shortly.</p>\n"),
    }

    body.push_str(&format!(
        "    <p class=\"count\">Total evolutions: {total}</p>\n"
    ));
    layout("HotPuppy - Evolving AI Art", &body)
}

pub fn render_archive(images: &[ImageRecord]) -> String {
    let mut body = format!(
        "    <h2>Evolution history</h2>\n    <p class=\"count\">{} images</p>\n    <ol class=\"archive\">\n",
        images.len()
    );
    for img in images {
        body.push_str(&format!(
            "      <li id=\"image-{id}\">\n        <img src=\"{url}\" alt=\"Evolution #{id}\" loading=\"lazy\">\n        <p>#{id} {caption}</p>\n        <time datetime=\"{ts}\">{when}</time>\n      </li>\n",
            id = img.id,
            url = escape_html(&img.image_url),
            caption = caption(img),
            ts = img.created_at.to_rfc3339(),
            when = img.created_at.format("%Y-%m-%d %H:%M UTC"),
        ));
    }
    body.push_str("    </ol>\n");
    layout("HotPuppy - Archive", &body)
}

fn caption(img: &ImageRecord) -> String {
    match (&img.user_input, img.is_seed) {
        (_, true) => "The original hot puppy".to_string(),
        (Some(input), false) => format!("Evolved with: {}", escape_html(input)),
        (None, false) => String::new(),
    }
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, input: Option<&str>) -> ImageRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "image_url": format!("https://img/{id}"),
            "prompt": "P",
            "user_input": input,
            "is_seed": id == 1,
            "created_at": "2026-10-18T09:30:00.000Z",
        }))
        .expect("valid record")
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render_index(Some(&record(2, Some("<script>alert(1)</script>"))), 2, false);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_index_welcome_only_on_first_visit() {
        let img = record(1, None);
        assert!(render_index(Some(&img), 1, true).contains("Welcome!"));
        assert!(!render_index(Some(&img), 1, false).contains("Welcome!"));
    }

    #[test]
    fn test_index_without_image() {
        let html = render_index(None, 0, false);
        assert!(html.contains("still being drawn"));
        assert!(!html.contains("evolve-form"));
        assert!(html.contains("Total evolutions: 0"));
    }

    #[test]
    fn test_archive_lists_oldest_first() {
        let html = render_archive(&[record(1, None), record(2, Some("hat"))]);
        let first = html.find("image-1").unwrap();
        let second = html.find("image-2").unwrap();
        assert!(first < second);
        assert!(html.contains("Evolved with: hat"));
        assert!(html.contains("2026-10-18 09:30 UTC"));
    }
}
