pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_campaigns.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_campaigns.sql")),
				"tables/003_survey_instances.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_survey_instances.sql")),
				"tables/004_responses.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_responses.sql")),
				"tables/005_delivery_records.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_delivery_records.sql")),
				"tables/006_inbound_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_inbound_messages.sql")),
				"tables/007_dispatch_runs.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_dispatch_runs.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
