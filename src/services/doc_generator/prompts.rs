//! LLM Prompt 模板
//!
//! 定义源码文档生成使用的 Prompt 模板

/// 源码文件文档 Prompt
///
/// 占位符：`{file_path}`、`{code_content}`
pub const CODE_DOC_PROMPT: &str = r#"请为下面的源码文件编写一份专业的技术文档，使用 Markdown 格式，内容包括：
1. 文件概述：所属模块、设计目的；
2. 核心类：类的继承关系，以及注解（如 @Controller、@Service）的含义；
3. 方法详情：每个 public 方法的作用、参数类型与约束、返回值、可能抛出的异常；
4. 业务逻辑：关键流程的分步说明（例如登录流程的各个步骤）；
5. 依赖说明：引用的其他类、配置文件或第三方库。

文件路径: {file_path}

代码内容:
```
{code_content}
```
"#;

/// 按名称填充模板中的 `{name}` 占位符
///
/// 单遍替换：已填入的值里即便出现占位符文本也不会被再次展开。
/// 未知的 `{...}` 原样保留。
pub fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let tail = &rest[start + 1..];

        let hit = fields.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });

        match hit {
            Some((name, value)) => {
                output.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                output.push('{');
                rest = tail;
            }
        }
    }

    output.push_str(rest);
    output
}

/// 格式化源码文档 Prompt
pub fn format_code_doc_prompt(file_path: &str, code_content: &str) -> String {
    fill_template(
        CODE_DOC_PROMPT,
        &[("file_path", file_path), ("code_content", code_content)],
    )
}
