pub const SCHEMA: &str = "
-- Core prompts table
CREATE TABLE IF NOT EXISTS prompts (
    id INTEGER PRIMARY KEY AUTOINCREMENT, -- Store-assigned, never reused
    name TEXT NOT NULL,                   -- Display title
    description TEXT NOT NULL,            -- Short summary
    content TEXT NOT NULL,                -- The prompt text
    created_at INTEGER NOT NULL,          -- Unix timestamp (seconds)
    updated_at INTEGER NOT NULL           -- Unix timestamp (seconds)
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_prompts_updated ON prompts(updated_at DESC);
";
